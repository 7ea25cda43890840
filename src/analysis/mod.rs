//! Analysis Client
//!
//! Sends the full editor text to the lexical analysis service and renders
//! what comes back: classified tokens to the token panel, diagnostics and
//! a status line to the terminal.
//!
//! ## Ordering
//!
//! Requests can overlap (debounced edits, a manual run, another edit).
//! Every request takes a sequence number when it is issued; a completion
//! is applied only if its number is higher than that of the last applied
//! result. Stale completions are dropped, so the panel never regresses to
//! an older source.
//!
//! ## Silent requests
//!
//! Keystroke-triggered requests are silent: they refresh the token panel
//! and nothing else. Only explicit requests write to the terminal and move
//! the status indicator.
//!
//! An explicit request overtaken by a newer silent one still reports its
//! verdict to the terminal and the indicator; only the panel stays with
//! the newer source.

use crate::classify::TokenClassifier;
use crate::error::Result;
use crate::models::{AnalysisResult, ClassifiedToken, LexicalStatus};
use crate::remote::{AnalysisTransport, LexResponse};
use crate::terminal::{write_line, LineEnding, TerminalSurface};

/// Text written when an explicit analysis is issued
pub const ANALYSIS_BANNER: &str = "Running lexical analysis...";

/// Text written on a successful explicit analysis
pub const SUCCESS_MESSAGE: &str = "Lexical analysis successful!";

/// Text written when an explicit analysis never reached the service
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error running lexical analysis.";

/// Token panel and status indicator
pub trait AnalysisView {
    /// Replace the panel rows
    fn render_tokens(&mut self, tokens: &[ClassifiedToken]);

    fn set_status(&mut self, status: LexicalStatus);

    /// Empty the panel and reset the indicator
    fn clear(&mut self);
}

/// Handle for one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub sequence: u64,
    pub silent: bool,
}

/// Sequencing and rendering front of the analysis service
#[derive(Debug)]
pub struct AnalysisClient {
    classifier: TokenClassifier,
    line_ending: LineEnding,
    next_sequence: u64,
    last_applied: u64,
    last_reported: u64,
    latest: Option<AnalysisResult>,
    status: LexicalStatus,
}

impl AnalysisClient {
    pub fn new(classifier: TokenClassifier, line_ending: LineEnding) -> Self {
        Self {
            classifier,
            line_ending,
            next_sequence: 0,
            last_applied: 0,
            last_reported: 0,
            latest: None,
            status: LexicalStatus::Unknown,
        }
    }

    pub fn classifier(&self) -> &TokenClassifier {
        &self.classifier
    }

    /// Swap the vocabulary used for later completions
    pub fn set_classifier(&mut self, classifier: TokenClassifier) {
        info!("Analysis now classifies with profile '{}'", classifier.profile().name);
        self.classifier = classifier;
    }

    /// Most recently applied result
    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.latest.as_ref()
    }

    /// Current status indicator value
    pub fn status(&self) -> LexicalStatus {
        self.status
    }

    /// Sequence number of the most recently applied result (0 if none)
    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    /// Issue a new request number
    ///
    /// Explicit requests open a fresh line on the terminal and announce
    /// themselves.
    pub fn issue<T: TerminalSurface + ?Sized>(&mut self, silent: bool, term: &mut T) -> AnalysisTicket {
        self.next_sequence += 1;
        if !silent {
            term.write(self.line_ending.as_str());
            write_line(term, ANALYSIS_BANNER, self.line_ending);
        }
        trace!(sequence = self.next_sequence, silent, "analysis issued");
        AnalysisTicket {
            sequence: self.next_sequence,
            silent,
        }
    }

    /// Apply the outcome of `ticket`
    ///
    /// Returns the applied result, or `None` when a newer result was
    /// already applied and this one was dropped. A dropped explicit
    /// outcome is still reported unless a newer explicit one already was.
    pub fn complete<T, V>(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<LexResponse>,
        term: &mut T,
        view: &mut V,
    ) -> Option<&AnalysisResult>
    where
        T: TerminalSurface + ?Sized,
        V: AnalysisView + ?Sized,
    {
        let superseded = ticket.sequence <= self.last_applied;
        if superseded && (ticket.silent || ticket.sequence <= self.last_reported) {
            debug!(
                sequence = ticket.sequence,
                applied = self.last_applied,
                "Discarding stale analysis completion"
            );
            return None;
        }

        let (result, reached_service) = match outcome {
            Ok(response) => {
                let tokens = self.classifier.classify_all(&response.tokens);
                (AnalysisResult::new(ticket.sequence, tokens, response.errors), true)
            }
            Err(e) => {
                warn!("Lexical analysis request failed: {}", e);
                (AnalysisResult::transport_failure(ticket.sequence, e), false)
            }
        };

        if !ticket.silent {
            self.report(&result, reached_service, term, view);
        }

        if superseded {
            debug!(
                sequence = ticket.sequence,
                applied = self.last_applied,
                "Reported superseded analysis; panel keeps the newer result"
            );
            return None;
        }

        view.render_tokens(&result.tokens);
        debug!(
            sequence = result.sequence,
            tokens = result.tokens.len(),
            diagnostics = result.diagnostics.len(),
            "Analysis applied"
        );

        self.last_applied = ticket.sequence;
        self.latest = Some(result);
        self.latest.as_ref()
    }

    /// Terminal lines and indicator for an explicit outcome
    fn report<T, V>(
        &mut self,
        result: &AnalysisResult,
        reached_service: bool,
        term: &mut T,
        view: &mut V,
    ) where
        T: TerminalSurface + ?Sized,
        V: AnalysisView + ?Sized,
    {
        if !reached_service {
            write_line(term, TRANSPORT_FAILURE_MESSAGE, self.line_ending);
        } else if result.succeeded() {
            write_line(term, SUCCESS_MESSAGE, self.line_ending);
        } else {
            for diagnostic in &result.diagnostics {
                write_line(term, diagnostic, self.line_ending);
            }
        }
        self.last_reported = result.sequence;
        self.status = result.status();
        view.set_status(self.status);
    }

    /// Issue, await and apply one request
    pub async fn analyze<A, T, V>(
        &mut self,
        transport: &A,
        source: &str,
        silent: bool,
        term: &mut T,
        view: &mut V,
    ) -> Option<&AnalysisResult>
    where
        A: AnalysisTransport + ?Sized,
        T: TerminalSurface + ?Sized,
        V: AnalysisView + ?Sized,
    {
        let ticket = self.issue(silent, term);
        let outcome = transport.analyze(source).await;
        self.complete(ticket, outcome, term, view)
    }

    /// Forget the displayed state (terminal clear)
    ///
    /// Sequence numbers keep counting so that completions issued before
    /// the reset still lose against later ones.
    pub fn reset<V: AnalysisView + ?Sized>(&mut self, view: &mut V) {
        self.latest = None;
        self.status = LexicalStatus::Unknown;
        view.clear();
    }
}
