//! Seedbed - interactive core of a browser IDE for small teaching languages
//!
//! This library holds everything between the editor/terminal widgets and
//! the remote language services: token classification for the token panel,
//! the lexical analysis client, and the execution session that bridges a
//! remote program's input requests to the user's terminal.
//!
//! ## Features
//!
//! - **Total classification:** every token gets a row; unknown backend
//!   kinds degrade to an unclassified row instead of failing
//! - **Language profiles:** vocabulary tables per taught language (`gal`,
//!   `cgma`), swapped by configuration
//! - **Ordered analysis:** sequence-numbered requests, stale completions
//!   are dropped
//! - **Input bridge:** line editing for remote `input_required` requests
//! - **Configuration:** TOML or JSON files with validated defaults
//!
//! ## Module Organization
//!
//! - [`classify`] - TokenClassifier and language profiles
//! - [`analysis`] - AnalysisClient and the token panel seam
//! - [`execution`] - ExecutionSession state machine
//! - [`terminal`] - terminal surface, keystroke capture, output routing
//! - [`remote`] - wire types, HTTP transports, execution channel
//! - [`debounce`] - single-slot edit debouncer
//! - [`workbench`] - the event loop tying one editor to one terminal
//! - [`config`] - configuration loading and validation
//! - [`models`] - tokens, analysis results, session state
//! - [`mod@error`] - error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use seedbed::classify::TokenClassifier;
//! use seedbed::models::RawToken;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = TokenClassifier::for_profile("gal")?;
//! let row = classifier.classify(&RawToken::new("plant", "plant"));
//! assert_eq!(row.map(|t| t.label), Some("plant".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Single-threaded and cooperative: the [`workbench::Workbench`] loop polls
//! UI events, the debounce deadline, in-flight requests and the execution
//! channel from one task. The websocket adapter runs its reader and writer
//! on their own tasks and talks to the loop only through ordered queues.

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod analysis;
pub mod classify;
pub mod config;
pub mod debounce;
pub mod error;
pub mod execution;
pub mod models;
pub mod remote;
pub mod terminal;
pub mod workbench;

// Re-exports for core functionality
pub use analysis::{AnalysisClient, AnalysisView};
pub use classify::{LanguageProfile, TokenClassifier};
pub use config::{Config, RuntimeConfig};
pub use error::{Error, Result};
pub use execution::ExecutionSession;
pub use terminal::{InputBridge, TerminalSurface};
pub use workbench::{UiEvent, Workbench};

// Convenience re-exports for common types
pub use config::loader::ConfigLoader;

// Version information
/// The current version of Seedbed from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize Seedbed with configuration from the default locations
///
/// Falls back to built-in defaults when no configuration file can be
/// loaded.
///
/// # Examples
///
/// ```no_run
/// use seedbed::init;
///
/// match init() {
///     Ok(config) => println!("profile: {}", config.profile().name),
///     Err(e) => eprintln!("Initialization failed: {}", e),
/// }
/// ```
pub fn init() -> Result<RuntimeConfig> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => {
            debug!("Configuration loaded from default location");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    let runtime_config = RuntimeConfig::from_config(config, None)?;
    info!(
        "{} ready (profile '{}')",
        NAME,
        runtime_config.profile().name
    );
    Ok(runtime_config)
}

/// Initialize Seedbed with a specific configuration file
pub fn init_with_config(config_path: &std::path::Path) -> Result<RuntimeConfig> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    if !config_path.exists() {
        return Err(Error::ConfigLoadFailed {
            path: config_path.to_path_buf(),
            reason: "Configuration file does not exist".to_string(),
        });
    }

    let runtime_config = RuntimeConfig::load_from_file(config_path).map_err(|e| {
        error!(
            "Failed to load configuration from {}: {}",
            config_path.display(),
            e
        );
        e
    })?;

    info!("Configuration loaded from: {}", config_path.display());
    Ok(runtime_config)
}

/// User-facing explanation of a startup failure
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::ConfigLoadFailed { path, reason } => {
            format!(
                "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check configuration file syntax\n• Ensure file permissions are correct",
                path.display(),
                reason
            )
        }
        Error::ConfigParseFailed { format, reason } => {
            format!(
                "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Ensure file is valid {}",
                format, reason, format
            )
        }
        Error::ConfigValidationFailed { field, reason } => {
            format!(
                "Configuration Error: Validation failed for '{}': {}",
                field, reason
            )
        }
        Error::UnknownProfile { name } => {
            format!(
                "Configuration Error: Unknown language profile '{}'\n\nAvailable profiles: {}",
                name,
                classify::profile::builtin_names().join(", ")
            )
        }
        Error::ChannelConnectFailed { url, reason } => {
            format!(
                "Connection Error: Cannot reach the execution service at '{}': {}\n\nTry:\n• Start the language server\n• Check execution.channel_url",
                url, reason
            )
        }
        _ => {
            format!(
                "Unexpected Error: {}\n\nPlease report this issue with debug logs enabled",
                error
            )
        }
    }
}
