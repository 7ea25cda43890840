//! Core data models for Seedbed
//!
//! Tokens as the analysis service sends them, tokens as the panel shows
//! them, analysis results, and execution session state.

pub mod analysis;
pub mod session;
pub mod token;

// Re-exports for convenience
pub use analysis::{AnalysisResult, LexicalStatus};
pub use session::SessionState;
pub use token::{Category, ClassifiedToken, Literal, Punctuation, RawToken};
