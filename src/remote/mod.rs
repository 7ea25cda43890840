//! Remote Services
//!
//! The analysis endpoint and the execution service are opaque to the core.
//! This module fixes the wire shapes the core exchanges with them and the
//! seams ([`AnalysisTransport`], [`RunLauncher`]) behind which concrete
//! clients live.
//!
//! ## Wire format
//!
//! - analysis: `POST {source_code}` answered by `{tokens, errors}`
//! - start run: `POST {source_code}` answered by `{success, errors}`
//! - duplex channel: JSON frames `{"event": <name>, "data": {...}}`

pub mod http;
pub mod socket;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::RawToken;
use crate::terminal::CaptureInput;

pub use http::{HttpAnalysisTransport, HttpRunLauncher};
pub use socket::{connect, in_memory, ChannelHandle, RemoteEnd};

/// Body of an analysis request
#[derive(Debug, Clone, Serialize)]
pub struct LexRequest<'a> {
    pub source_code: &'a str,
}

/// Body of an analysis response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexResponse {
    #[serde(default)]
    pub tokens: Vec<RawToken>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Body of a start-run request
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest<'a> {
    pub source_code: &'a str,
}

/// Body of a start-run response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Events the execution service pushes to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A chunk of program output
    Output { output: String },

    /// The program blocked on a read of `variable`
    InputRequired {
        #[serde(default)]
        prompt: String,
        variable: String,
    },

    /// The program ended normally
    RunFinished {},

    /// The program ended with runtime diagnostics
    RunFailed {
        #[serde(default)]
        errors: Vec<String>,
    },
}

impl ServerEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Output { .. } => "output",
            ServerEvent::InputRequired { .. } => "input_required",
            ServerEvent::RunFinished {} => "run_finished",
            ServerEvent::RunFailed { .. } => "run_failed",
        }
    }
}

/// Messages the client sends over the duplex channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Answer to exactly one `input_required`
    CaptureInput(CaptureInput),
}

/// Decode one channel frame
pub fn decode_frame(text: &str) -> Result<ServerEvent> {
    serde_json::from_str(text).map_err(|e| Error::MalformedFrame {
        reason: e.to_string(),
    })
}

/// Encode one channel frame
pub fn encode_frame(message: &ClientMessage) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Request/response lexical analysis service
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Send the full source text and return the service's answer
    async fn analyze(&self, source: &str) -> Result<LexResponse>;
}

/// Starts a run on the execution service
#[async_trait]
pub trait RunLauncher: Send + Sync {
    async fn start_run(&self, source: &str) -> Result<RunResponse>;
}
