//! Execution Session State

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the execution session bound to a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No run in progress
    #[default]
    Idle,
    /// Remote program is running
    Running,
    /// Remote program is blocked on a read; the terminal is in capture mode
    AwaitingInput,
    /// Remote program finished
    Completed,
    /// Remote program or its launch failed
    Failed,
}

impl SessionState {
    /// Whether the session currently owns the terminal
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Running | SessionState::AwaitingInput)
    }

    /// Whether the session reached an end state
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::AwaitingInput => "awaiting input",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}
