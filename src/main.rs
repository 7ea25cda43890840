//! Seedbed console front end
//!
//! Runs the same analysis and execution flow as the browser IDE against a
//! source file: `lex` prints the token table, `run` executes the program
//! and bridges stdin to its input requests.

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use seedbed::analysis::{AnalysisClient, AnalysisView};
use seedbed::classify::TokenClassifier;
use seedbed::config::RuntimeConfig;
use seedbed::error::Result;
use seedbed::models::{ClassifiedToken, LexicalStatus, SessionState};
use seedbed::remote::HttpAnalysisTransport;
use seedbed::terminal::TerminalSurface;
use seedbed::workbench::{Services, UiEvent, Workbench};

/// Subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Lex,
    Run,
}

/// Command line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug mode
    debug: bool,
    /// Language profile override
    profile: Option<String>,
    command: Option<Command>,
    file: Option<PathBuf>,
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        app_args.config_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        return Err("Missing config file path".into());
                    }
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--profile" | "-p" => {
                    if i + 1 < args.len() {
                        app_args.profile = Some(args[i + 1].clone());
                        i += 1;
                    } else {
                        return Err("Missing profile name".into());
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("Seedbed v{}", seedbed::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(format!("Unknown option: {}", arg).into());
                }
                "lex" if app_args.command.is_none() => app_args.command = Some(Command::Lex),
                "run" if app_args.command.is_none() => app_args.command = Some(Command::Run),
                arg if app_args.command.is_some() && app_args.file.is_none() => {
                    app_args.file = Some(PathBuf::from(arg));
                }
                arg => {
                    return Err(format!("Unexpected argument: {}", arg).into());
                }
            }
            i += 1;
        }

        if app_args.command.is_none() || app_args.file.is_none() {
            return Err("Expected a command and a source file".into());
        }

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("Seedbed - analysis and execution console for teaching languages");
    println!();
    println!("USAGE:");
    println!("    seedbed [OPTIONS] <COMMAND> <FILE>");
    println!();
    println!("COMMANDS:");
    println!("    lex      Run lexical analysis and print the token table");
    println!("    run      Analyse, then run the program with stdin as its input");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>      Path to configuration file");
    println!("    -p, --profile <NAME>     Language profile (gal, cgma)");
    println!("    -d, --debug              Enable debug logging");
    println!("    -h, --help               Print this help message");
    println!("    -V, --version            Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    Seedbed looks for configuration files in the following order:");
    println!("    1. Path specified with --config");
    println!("    2. $SEEDBED_CONFIG");
    println!("    3. $XDG_CONFIG_HOME/seedbed/config.toml (or config.json)");
    println!("    4. ~/.seedbed/config.toml");
    println!("    5. ./seedbed.toml");
    println!("    6. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    SEEDBED_CONFIG      Path to configuration file");
    println!("    SEEDBED_DEBUG       Enable debug mode (1 or true)");
    println!("    RUST_LOG            Set logging level (error, warn, info, debug, trace)");
}

/// Terminal surface on stdout
///
/// The console already echoes what the user types, so local echo is off.
struct ConsoleTerminal;

impl TerminalSurface for ConsoleTerminal {
    fn write(&mut self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn echo(&mut self, _text: &str) {}

    fn clear(&mut self) {
        self.write("\x1b[2J\x1b[H");
    }
}

/// Token panel collected for printing
#[derive(Default)]
struct TokenTable {
    rows: Vec<ClassifiedToken>,
    status: LexicalStatus,
}

impl AnalysisView for TokenTable {
    fn render_tokens(&mut self, tokens: &[ClassifiedToken]) {
        self.rows = tokens.to_vec();
    }

    fn set_status(&mut self, status: LexicalStatus) {
        self.status = status;
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.status = LexicalStatus::Unknown;
    }
}

impl TokenTable {
    fn print(&self) {
        let headers = ["Lexeme", "Token", "Token Type"];
        let mut widths = headers.map(str::len);
        for row in &self.rows {
            for (width, column) in widths.iter_mut().zip(row.columns()) {
                *width = (*width).max(display_text(column).chars().count());
            }
        }

        println!(
            "{:<w0$}  {:<w1$}  {}",
            headers[0],
            headers[1],
            headers[2],
            w0 = widths[0],
            w1 = widths[1]
        );
        for row in &self.rows {
            let [lexeme, label, category] = row.columns();
            println!(
                "{:<w0$}  {:<w1$}  {}",
                display_text(lexeme),
                display_text(label),
                category,
                w0 = widths[0],
                w1 = widths[1]
            );
        }
        println!();
        println!("{}", self.status.label());
    }
}

/// Make whitespace lexemes visible in the table
fn display_text(text: &str) -> String {
    text.escape_debug().to_string()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        print_help();
        process::exit(1);
    });

    // Initialize logging based on debug flag
    let log_level = if args.debug
        || env::var("SEEDBED_DEBUG").is_ok_and(|v| v == "1" || v.to_lowercase() == "true")
    {
        "debug"
    } else {
        "warn"
    };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    info!("Starting Seedbed v{}", seedbed::VERSION);

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", seedbed::handle_startup_error(&e));
            1
        }
    };

    process::exit(code);
}

async fn run(args: AppArgs) -> Result<i32> {
    let runtime = load_configuration(&args)?;

    let file = args.file.clone().unwrap_or_default();
    let source = tokio::fs::read_to_string(&file).await?;
    debug!("Read {} bytes from {}", source.len(), file.display());

    match args.command {
        Some(Command::Run) => run_program(&runtime, source).await,
        _ => lex(&runtime, &source).await,
    }
}

/// Load configuration from file or use defaults
fn load_configuration(args: &AppArgs) -> Result<RuntimeConfig> {
    let mut runtime_config = match &args.config_path {
        Some(path) => seedbed::init_with_config(path)?,
        None => seedbed::init()?,
    };

    if let Some(profile) = &args.profile {
        debug!("Applying profile override: {}", profile);
        runtime_config.set_profile(profile)?;
    }

    Ok(runtime_config)
}

async fn lex(runtime: &RuntimeConfig, source: &str) -> Result<i32> {
    let config = runtime.config();
    let transport = HttpAnalysisTransport::new(&config.analysis)?;
    let mut client = AnalysisClient::new(
        TokenClassifier::new(runtime.profile()),
        config.terminal.line_ending,
    );
    let mut terminal = ConsoleTerminal;
    let mut table = TokenTable::default();

    let succeeded = client
        .analyze(&transport, source, false, &mut terminal, &mut table)
        .await
        .is_some_and(|result| result.succeeded());

    println!();
    table.print();
    Ok(if succeeded { 0 } else { 2 })
}

async fn run_program(runtime: &RuntimeConfig, source: String) -> Result<i32> {
    let services = Services::connect(runtime.config()).await?;
    let mut bench = Workbench::new(runtime, ConsoleTerminal, TokenTable::default(), services);
    bench.load_source(source);

    // No UI events on the console; the sender only keeps the stream open
    let (_ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    let state = bench.run_program_with_input(&mut ui_rx, &mut line_rx).await;
    info!("Run ended: {}", state);

    Ok(match state {
        SessionState::Completed => 0,
        SessionState::Idle => 2,
        _ => 1,
    })
}
