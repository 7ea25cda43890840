//! Error types and Result aliases for Seedbed

use std::fmt;
use std::path::PathBuf;

/// Result type alias for Seedbed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Seedbed
#[derive(Debug)]
pub enum Error {
    // === Analysis errors ===
    /// The analysis service could not be reached or answered garbage
    AnalysisTransportFailed {
        endpoint: String,
        reason: String,
    },

    /// The analysis service answered with a non-success HTTP status
    AnalysisHttpStatus {
        endpoint: String,
        status: u16,
    },

    // === Execution errors ===
    /// A run was requested while another session still owns the terminal
    SessionBusy {
        session_id: String,
    },

    /// A run was refused because the latest analysis reported diagnostics
    RunRefused {
        diagnostics: usize,
    },

    /// The execution service rejected or failed to start the run
    RunLaunchFailed {
        endpoint: String,
        reason: String,
    },

    /// The duplex channel to the execution service is closed
    ChannelClosed,

    /// Failed to connect the duplex channel
    ChannelConnectFailed {
        url: String,
        reason: String,
    },

    /// A frame on the duplex channel could not be decoded
    MalformedFrame {
        reason: String,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration file not found
    ConfigNotFound,

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    /// Failed to serialize configuration
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// No vocabulary profile with this name
    UnknownProfile {
        name: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// HTTP client errors
    Http(reqwest::Error),

    /// WebSocket errors
    WebSocket(tokio_tungstenite::tungstenite::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Analysis errors
            Error::AnalysisTransportFailed { endpoint, reason } => {
                write!(f, "Analysis request to '{}' failed: {}", endpoint, reason)
            }
            Error::AnalysisHttpStatus { endpoint, status } => {
                write!(f, "HTTP error! status: {} ({})", status, endpoint)
            }

            // Execution errors
            Error::SessionBusy { session_id } => {
                write!(f, "Session '{}' is still running", session_id)
            }
            Error::RunRefused { diagnostics } => {
                write!(
                    f,
                    "Run refused: lexical analysis reported {} diagnostic(s)",
                    diagnostics
                )
            }
            Error::RunLaunchFailed { endpoint, reason } => {
                write!(f, "Failed to start run at '{}': {}", endpoint, reason)
            }
            Error::ChannelClosed => {
                write!(f, "Execution channel is closed")
            }
            Error::ChannelConnectFailed { url, reason } => {
                write!(f, "Failed to connect execution channel '{}': {}", url, reason)
            }
            Error::MalformedFrame { reason } => {
                write!(f, "Malformed channel frame: {}", reason)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigNotFound => {
                write!(f, "Configuration file not found")
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize config as {}: {}", format, reason)
            }
            Error::UnknownProfile { name } => {
                write!(f, "Unknown language profile: '{}'", name)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::WebSocket(err) => write!(f, "WebSocket error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Whether the error leaves the workbench usable for another attempt
    ///
    /// Every remote failure is recoverable; only a closed channel needs a
    /// reconnect before the next run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::ChannelClosed)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::ConfigValidationFailed {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
