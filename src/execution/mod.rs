//! Execution Session
//!
//! Client-side state machine for one remote program run:
//!
//! ```text
//! Idle -> Running -> (AwaitingInput <-> Running)* -> Completed | Failed
//!   ^______________________ reset ______________________________|
//! ```
//!
//! The session owns the [`InputBridge`], so the terminal's keystroke
//! listener can only be held while the session is `AwaitingInput`.
//! Transport (start-run request, duplex channel) stays with the caller;
//! the session consumes remote events and produces client messages.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::TerminalConfig;
use crate::error::{Error, Result};
use crate::models::SessionState;
use crate::remote::{ClientMessage, RunResponse, ServerEvent};
use crate::terminal::{write_line, write_output, InputBridge, LineEnding, TerminalSurface};

/// Text written before a run is launched
pub const RUN_BANNER: &str = "Running program...";

/// Text written when the start-run request never reached the service
pub const LAUNCH_FAILURE_MESSAGE: &str = "Error running source code.";

/// One execution session bound to a terminal
#[derive(Debug)]
pub struct ExecutionSession {
    state: SessionState,
    session_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    pending_prompt: Option<String>,
    bridge: InputBridge,
    line_ending: LineEnding,
    echo_prompt: bool,
    captured: usize,
    complete_on_response: bool,
}

impl ExecutionSession {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            state: SessionState::Idle,
            session_id: None,
            started_at: None,
            pending_prompt: None,
            bridge: InputBridge::new(config.line_ending),
            line_ending: config.line_ending,
            echo_prompt: config.echo_prompt,
            captured: 0,
            complete_on_response: true,
        }
    }

    /// Whether a successful start-run response ends the session
    ///
    /// Services that run the program inside the start-run request answer
    /// only after it finished; services that run it in the background
    /// signal the end with `run_finished` instead.
    pub fn with_complete_on_response(mut self, enabled: bool) -> Self {
        self.complete_on_response = enabled;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Variable the remote program is blocked on
    pub fn pending_variable(&self) -> Option<&str> {
        self.bridge.pending_variable()
    }

    pub fn pending_prompt(&self) -> Option<&str> {
        self.pending_prompt.as_deref()
    }

    /// Characters typed for the pending request so far
    pub fn input_buffer(&self) -> &str {
        self.bridge.buffer()
    }

    /// Number of inputs answered in this session
    pub fn captured_inputs(&self) -> usize {
        self.captured
    }

    /// `Idle | Completed | Failed -> Running`
    ///
    /// The lexical precondition is checked by the caller before this point.
    pub fn begin_run(&mut self) -> Result<Uuid> {
        if self.state.is_active() {
            return Err(Error::SessionBusy {
                session_id: self
                    .session_id
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
            });
        }

        let id = Uuid::new_v4();
        self.session_id = Some(id);
        self.started_at = Some(Utc::now());
        self.pending_prompt = None;
        self.captured = 0;
        self.bridge.release();
        self.state = SessionState::Running;

        info!(session_id = %id, "Execution session started");
        Ok(id)
    }

    /// Apply the answer to the start-run request
    pub fn apply_launch<T: TerminalSurface + ?Sized>(
        &mut self,
        outcome: Result<RunResponse>,
        term: &mut T,
    ) {
        if self.state == SessionState::Idle {
            warn!("Start-run answer arrived for a reset session, ignoring");
            return;
        }

        match outcome {
            Ok(response) if response.success => {
                if self.complete_on_response && self.state.is_active() {
                    self.finish(SessionState::Completed);
                }
            }
            Ok(response) => {
                for error in &response.errors {
                    write_line(term, error, self.line_ending);
                }
                self.finish(SessionState::Failed);
            }
            Err(e) => {
                error!("Failed to start run: {}", e);
                write_line(term, LAUNCH_FAILURE_MESSAGE, self.line_ending);
                self.finish(SessionState::Failed);
            }
        }
    }

    /// Apply one remote event, in the order the remote emitted it
    ///
    /// Returns false when the event was ignored.
    pub fn apply<T: TerminalSurface + ?Sized>(&mut self, event: ServerEvent, term: &mut T) -> bool {
        if self.state == SessionState::Idle {
            warn!(event = event.name(), "Remote event without a session, ignoring");
            return false;
        }

        match event {
            ServerEvent::Output { output } => {
                write_output(term, &output, self.line_ending);
                true
            }
            ServerEvent::InputRequired { prompt, variable } => {
                if !self.state.is_active() {
                    warn!(variable = %variable, "Input requested after the run ended, ignoring");
                    return false;
                }
                if self.echo_prompt && !prompt.is_empty() {
                    write_output(term, &prompt, self.line_ending);
                }
                debug!(variable = %variable, "Awaiting input");
                self.bridge.begin(variable);
                self.pending_prompt = Some(prompt);
                self.state = SessionState::AwaitingInput;
                true
            }
            ServerEvent::RunFinished {} => {
                if !self.state.is_active() {
                    return false;
                }
                self.finish(SessionState::Completed);
                true
            }
            ServerEvent::RunFailed { errors } => {
                for error in &errors {
                    write_line(term, error, self.line_ending);
                }
                self.finish(SessionState::Failed);
                true
            }
        }
    }

    /// Route terminal keystrokes
    ///
    /// Returns the message to transmit when a line was submitted.
    pub fn handle_terminal_data<T: TerminalSurface + ?Sized>(
        &mut self,
        data: &str,
        term: &mut T,
    ) -> Option<ClientMessage> {
        if self.state != SessionState::AwaitingInput {
            return None;
        }

        let capture = self.bridge.handle_data(data, term)?;
        self.state = SessionState::Running;
        self.pending_prompt = None;
        self.captured += 1;
        debug!(variable = %capture.var_name, "Input captured");
        Some(ClientMessage::CaptureInput(capture))
    }

    /// Fail the session locally (lost channel, undeliverable input)
    pub fn fail<T: TerminalSurface + ?Sized>(&mut self, diagnostics: &[String], term: &mut T) {
        if self.state == SessionState::Idle {
            return;
        }
        for line in diagnostics {
            write_line(term, line, self.line_ending);
        }
        self.finish(SessionState::Failed);
    }

    /// Clear the terminal and return to `Idle` from any state
    pub fn reset<T: TerminalSurface + ?Sized>(&mut self, term: &mut T) {
        term.clear();
        self.bridge.release();
        self.pending_prompt = None;
        self.session_id = None;
        self.started_at = None;
        self.state = SessionState::Idle;
        debug!("Execution session reset");
    }

    fn finish(&mut self, state: SessionState) {
        self.bridge.release();
        self.pending_prompt = None;
        self.state = state;

        let elapsed_ms = self
            .started_at
            .map(|start| (Utc::now() - start).num_milliseconds())
            .unwrap_or_default();
        info!(
            session_id = ?self.session_id,
            state = %state,
            elapsed_ms,
            inputs = self.captured,
            "Execution session ended"
        );
    }
}
