//! Mock token panel for testing

use seedbed::analysis::AnalysisView;
use seedbed::models::{ClassifiedToken, LexicalStatus};

/// Token panel that records every call
#[derive(Debug, Default)]
pub struct RecordingView {
    pub renders: Vec<Vec<ClassifiedToken>>,
    pub statuses: Vec<LexicalStatus>,
    pub clears: usize,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of the most recent render
    pub fn rows(&self) -> &[ClassifiedToken] {
        self.renders.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indicator value after the most recent update
    pub fn status(&self) -> Option<LexicalStatus> {
        self.statuses.last().copied()
    }
}

impl AnalysisView for RecordingView {
    fn render_tokens(&mut self, tokens: &[ClassifiedToken]) {
        self.renders.push(tokens.to_vec());
    }

    fn set_status(&mut self, status: LexicalStatus) {
        self.statuses.push(status);
    }

    fn clear(&mut self) {
        self.renders.push(Vec::new());
        self.statuses.push(LexicalStatus::Unknown);
        self.clears += 1;
    }
}
