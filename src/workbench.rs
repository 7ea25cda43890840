//! Workbench
//!
//! Owns one editor buffer with its debouncer, one analysis client and one
//! execution session, and drives them from a single cooperative loop:
//!
//! - UI events (edits, keystrokes, button presses)
//! - the debounce deadline
//! - in-flight remote requests
//! - events from the execution channel
//!
//! Nothing here runs in parallel; every remote call is a future polled by
//! the same loop, so state is only touched between awaits.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::analysis::{AnalysisClient, AnalysisTicket, AnalysisView};
use crate::classify::TokenClassifier;
use crate::config::{Config, RuntimeConfig};
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::execution::{ExecutionSession, RUN_BANNER};
use crate::models::{LexicalStatus, SessionState};
use crate::remote::{
    self, AnalysisTransport, ChannelHandle, HttpAnalysisTransport, HttpRunLauncher, LexResponse,
    RunLauncher, RunResponse, ServerEvent,
};
use crate::terminal::{write_line, LineEnding, TerminalSurface};

/// Text written when the execution channel drops mid-run
pub const CHANNEL_LOST_MESSAGE: &str = "Connection to the execution service was lost.";

/// Input from the user interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The editor now holds this text
    SourceEdited(String),
    /// Raw data typed into the terminal
    TerminalData(String),
    /// Explicit lexical analysis
    Analyze,
    /// Analyse, then run if the analysis is clean
    Run,
    /// Clear the terminal, token panel and status
    Reset,
    Shutdown,
}

/// Remote endpoints the workbench talks to
pub struct Services {
    pub analysis: Arc<dyn AnalysisTransport>,
    pub launcher: Arc<dyn RunLauncher>,
    pub channel: ChannelHandle,
}

impl Services {
    /// HTTP transports plus a websocket channel, as configured
    pub async fn connect(config: &Config) -> Result<Self> {
        let analysis = Arc::new(HttpAnalysisTransport::new(&config.analysis)?);
        let launcher = Arc::new(HttpRunLauncher::new(&config.execution)?);
        let channel = remote::connect(&config.execution.channel_url).await?;
        Ok(Self {
            analysis,
            launcher,
            channel,
        })
    }
}

/// Lines typed before the program asked for them
///
/// Line-oriented front ends (a console reading stdin) queue every line
/// here; one line is released per input request.
#[derive(Debug, Default)]
pub struct TypeAhead {
    lines: VecDeque<String>,
}

impl TypeAhead {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Keystrokes for the oldest queued line, if the session is waiting
    /// for input
    pub fn release(&mut self, state: SessionState) -> Option<UiEvent> {
        if state != SessionState::AwaitingInput {
            return None;
        }
        self.lines
            .pop_front()
            .map(|line| UiEvent::TerminalData(format!("{}\r", line)))
    }
}

/// A remote call that finished
enum Completion {
    Analysis {
        ticket: AnalysisTicket,
        outcome: Result<LexResponse>,
    },
    Launch {
        session_id: Uuid,
        outcome: Result<RunResponse>,
    },
}

/// A run waiting on its gating analysis
struct PendingRun {
    sequence: u64,
    source: String,
}

/// Editor, terminal and token panel of one user
pub struct Workbench<T: TerminalSurface, V: AnalysisView> {
    source: String,
    terminal: T,
    view: V,
    line_ending: LineEnding,
    analysis: AnalysisClient,
    session: ExecutionSession,
    debouncer: Debouncer,
    transport: Arc<dyn AnalysisTransport>,
    launcher: Arc<dyn RunLauncher>,
    channel: ChannelHandle,
    channel_open: bool,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    pending_run: Option<PendingRun>,
}

impl<T: TerminalSurface, V: AnalysisView> Workbench<T, V> {
    /// Attach to a terminal and token panel; writes the ready banner
    pub fn new(runtime: &RuntimeConfig, mut terminal: T, view: V, services: Services) -> Self {
        let config = runtime.config();
        let line_ending = config.terminal.line_ending;

        if !config.terminal.ready_banner.is_empty() {
            write_line(&mut terminal, &config.terminal.ready_banner, line_ending);
        }

        Self {
            source: config.editor.initial_source.clone(),
            terminal,
            view,
            line_ending,
            analysis: AnalysisClient::new(TokenClassifier::new(runtime.profile()), line_ending),
            session: ExecutionSession::new(&config.terminal)
                .with_complete_on_response(config.execution.complete_on_response),
            debouncer: Debouncer::new(Duration::from_millis(config.editor.debounce_ms)),
            transport: services.analysis,
            launcher: services.launcher,
            channel: services.channel,
            channel_open: true,
            in_flight: FuturesUnordered::new(),
            pending_run: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the editor text without scheduling an analysis
    pub fn load_source(&mut self, text: impl Into<String>) {
        self.source = text.into();
        self.debouncer.cancel();
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn analysis(&self) -> &AnalysisClient {
        &self.analysis
    }

    pub fn session(&self) -> &ExecutionSession {
        &self.session
    }

    pub fn lexical_status(&self) -> LexicalStatus {
        self.analysis.status()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// No request in flight, no run waiting and no session active
    pub fn is_quiescent(&self) -> bool {
        self.in_flight.is_empty() && self.pending_run.is_none() && !self.session.state().is_active()
    }

    /// Apply one UI event; returns false on shutdown
    pub fn handle_ui(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::SourceEdited(text) => {
                self.source = text;
                self.debouncer.schedule();
            }
            UiEvent::TerminalData(data) => {
                if let Some(message) = self.session.handle_terminal_data(&data, &mut self.terminal) {
                    if let Err(e) = self.channel.send(message) {
                        error!("Failed to deliver input: {}", e);
                        self.session
                            .fail(&[CHANNEL_LOST_MESSAGE.to_string()], &mut self.terminal);
                    }
                }
            }
            UiEvent::Analyze => {
                self.spawn_analysis(false);
            }
            UiEvent::Run => self.request_run(),
            UiEvent::Reset => {
                self.debouncer.cancel();
                self.pending_run = None;
                self.session.reset(&mut self.terminal);
                self.analysis.reset(&mut self.view);
            }
            UiEvent::Shutdown => {
                info!("Workbench shutting down");
                return false;
            }
        }
        true
    }

    /// Apply one event from the execution service
    pub fn handle_remote(&mut self, event: ServerEvent) {
        self.session.apply(event, &mut self.terminal);
    }

    /// Apply every remote event already queued
    pub fn drain_remote(&mut self) {
        while let Some(event) = self.channel.try_recv() {
            self.handle_remote(event);
        }
    }

    /// Wait for the next source of work and handle it
    ///
    /// Returns false when the loop should stop (shutdown, UI gone).
    pub async fn step(&mut self, events: &mut mpsc::UnboundedReceiver<UiEvent>) -> bool {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => self.handle_ui(event),
                None => {
                    debug!("UI event stream closed");
                    false
                }
            },
            _ = self.debouncer.fired() => {
                self.spawn_analysis(true);
                true
            }
            Some(done) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                self.handle_completion(done);
                true
            }
            remote = self.channel.recv(), if self.channel_open => {
                match remote {
                    Some(event) => self.handle_remote(event),
                    None => self.on_channel_closed(),
                }
                true
            }
        }
    }

    /// Run until shutdown or until the UI event stream closes
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<UiEvent>) -> Result<()> {
        info!("Workbench event loop started");
        while self.step(&mut events).await {}
        Ok(())
    }

    /// Request a run and keep stepping until it is over
    ///
    /// Returns the state the session ended in; `Idle` means the run was
    /// refused before launch.
    pub async fn run_program(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<UiEvent>,
    ) -> SessionState {
        self.handle_ui(UiEvent::Run);
        while !self.is_quiescent() {
            if !self.step(events).await {
                break;
            }
        }
        self.drain_remote();
        self.session.state()
    }

    /// Like `run_program`, with input arriving as whole lines
    ///
    /// Lines are queued and submitted one per input request, so a line
    /// read before the program asks for it is not lost.
    pub async fn run_program_with_input(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<UiEvent>,
        lines: &mut mpsc::UnboundedReceiver<String>,
    ) -> SessionState {
        let mut typeahead = TypeAhead::default();
        let mut lines_open = true;

        self.handle_ui(UiEvent::Run);
        while !self.is_quiescent() {
            if let Some(event) = typeahead.release(self.session.state()) {
                self.handle_ui(event);
                continue;
            }

            tokio::select! {
                line = lines.recv(), if lines_open => match line {
                    Some(line) => typeahead.push(line),
                    None => {
                        debug!(queued = typeahead.len(), "Input lines closed");
                        lines_open = false;
                    }
                },
                more = self.step(events) => {
                    if !more {
                        break;
                    }
                }
            }
        }
        self.drain_remote();
        self.session.state()
    }

    fn spawn_analysis(&mut self, silent: bool) -> AnalysisTicket {
        let ticket = self.analysis.issue(silent, &mut self.terminal);
        let transport = Arc::clone(&self.transport);
        let source = self.source.clone();

        self.in_flight.push(
            async move {
                let outcome = transport.analyze(&source).await;
                Completion::Analysis { ticket, outcome }
            }
            .boxed(),
        );
        ticket
    }

    fn request_run(&mut self) {
        if self.session.state().is_active() {
            let busy = Error::SessionBusy {
                session_id: self
                    .session
                    .session_id()
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            };
            warn!("{}", busy);
            return;
        }

        self.terminal.write(self.line_ending.as_str());
        write_line(&mut self.terminal, RUN_BANNER, self.line_ending);

        let source = self.source.clone();
        let ticket = self.spawn_analysis(false);
        self.pending_run = Some(PendingRun {
            sequence: ticket.sequence,
            source,
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Analysis { ticket, outcome } => {
                let gates_run = self
                    .pending_run
                    .as_ref()
                    .is_some_and(|run| run.sequence == ticket.sequence);
                // The run is judged on its own outcome, even when a newer
                // analysis has already replaced it on the panel
                let diagnostics = match &outcome {
                    Ok(response) => response.errors.len(),
                    Err(_) => 1,
                };

                self.analysis
                    .complete(ticket, outcome, &mut self.terminal, &mut self.view);

                if !gates_run {
                    return;
                }
                if let Some(run) = self.pending_run.take() {
                    if diagnostics == 0 {
                        self.launch(run.source);
                    } else {
                        info!("{}", Error::RunRefused { diagnostics });
                    }
                }
            }
            Completion::Launch {
                session_id,
                outcome,
            } => {
                if self.session.session_id() != Some(session_id) {
                    debug!(%session_id, "Dropping start-run answer for a replaced session");
                    return;
                }
                self.session.apply_launch(outcome, &mut self.terminal);
            }
        }
    }

    fn launch(&mut self, source: String) {
        let session_id = match self.session.begin_run() {
            Ok(id) => id,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };

        let launcher = Arc::clone(&self.launcher);
        self.in_flight.push(
            async move {
                let outcome = launcher.start_run(&source).await;
                Completion::Launch {
                    session_id,
                    outcome,
                }
            }
            .boxed(),
        );
    }

    fn on_channel_closed(&mut self) {
        warn!("Execution channel closed");
        self.channel_open = false;
        if self.session.state().is_active() {
            self.session
                .fail(&[CHANNEL_LOST_MESSAGE.to_string()], &mut self.terminal);
        }
    }
}
