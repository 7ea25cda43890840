//! Analysis Result Model
//!
//! One completed lexical analysis: the classified token rows and the
//! diagnostics reported for the same source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClassifiedToken;

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Classified tokens in source order
    pub tokens: Vec<ClassifiedToken>,

    /// Diagnostic lines in the order the service reported them
    pub diagnostics: Vec<String>,

    /// Issue-order sequence number of the request that produced this
    pub sequence: u64,

    /// When the result was produced locally
    pub completed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Build a result for the request with the given sequence number
    pub fn new(sequence: u64, tokens: Vec<ClassifiedToken>, diagnostics: Vec<String>) -> Self {
        Self {
            tokens,
            diagnostics,
            sequence,
            completed_at: Utc::now(),
        }
    }

    /// Result standing in for a request that never reached the service
    pub fn transport_failure(sequence: u64, reason: impl std::fmt::Display) -> Self {
        Self::new(
            sequence,
            Vec::new(),
            vec![format!("Error running lexical analysis: {}", reason)],
        )
    }

    /// True iff no diagnostics were reported
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The status indicator value this result implies
    pub fn status(&self) -> LexicalStatus {
        if self.succeeded() {
            LexicalStatus::Ok
        } else {
            LexicalStatus::Error
        }
    }
}

/// Lexical status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LexicalStatus {
    /// Nothing analysed yet, or the terminal was reset
    #[default]
    Unknown,
    Ok,
    Error,
}

impl LexicalStatus {
    /// Indicator text
    pub fn label(self) -> &'static str {
        match self {
            LexicalStatus::Unknown => "Lexical: —",
            LexicalStatus::Ok => "Lexical: OK",
            LexicalStatus::Error => "Lexical: Error",
        }
    }
}
