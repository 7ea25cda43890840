//! Contract tests for the analysis client
//!
//! These tests verify how analysis outcomes reach the terminal, the token
//! panel and the status indicator, and that only the newest result wins.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use seedbed::analysis::{
    AnalysisClient, ANALYSIS_BANNER, SUCCESS_MESSAGE, TRANSPORT_FAILURE_MESSAGE,
};
use seedbed::classify::TokenClassifier;
use seedbed::models::{Category, LexicalStatus};
use seedbed::terminal::{LineEnding, MemoryTerminal};
use test_utils::*;

fn client() -> AnalysisClient {
    AnalysisClient::new(TokenClassifier::default(), LineEnding::CrLf)
}

#[cfg(test)]
mod explicit_analysis_tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_analysis_reports_success() {
        let lexer = ScriptedLexer::new(lex_ok(plant_program_tokens()));
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let result = client
            .analyze(&lexer, "plant x = 5;", false, &mut term, &mut view)
            .await
            .unwrap();

        assert!(result.succeeded());
        assert_eq!(
            term.contents(),
            format!("\r\n{}\r\n{}\r\n", ANALYSIS_BANNER, SUCCESS_MESSAGE)
        );
        assert_eq!(view.status(), Some(LexicalStatus::Ok));
        assert_eq!(client.status(), LexicalStatus::Ok);

        let rows = view.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].label, "plant");
        assert_eq!(rows[0].category, Category::ReservedWord);
        assert_eq!(rows[1].category, Category::Identifier);
        assert_eq!(lexer.calls(), vec!["plant x = 5;".to_string()]);
    }

    #[tokio::test]
    async fn test_diagnostics_are_written_in_order() {
        let lexer = ScriptedLexer::new(lex_error(&["Unexpected token", "Missing ;"]));
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let result = client
            .analyze(&lexer, "plant", false, &mut term, &mut view)
            .await
            .unwrap();

        assert!(!result.succeeded());
        assert_eq!(
            term.contents(),
            format!("\r\n{}\r\nUnexpected token\r\nMissing ;\r\n", ANALYSIS_BANNER)
        );
        assert_eq!(client.status(), LexicalStatus::Error);
        assert_eq!(view.status(), Some(LexicalStatus::Error));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let lexer = ScriptedLexer::unreachable("connection refused");
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let result = client
            .analyze(&lexer, "root(){}", false, &mut term, &mut view)
            .await
            .unwrap();

        assert!(!result.succeeded());
        assert!(result.tokens.is_empty());
        assert!(result.diagnostics[0].contains("connection refused"));
        assert_eq!(
            term.contents(),
            format!("\r\n{}\r\n{}\r\n", ANALYSIS_BANNER, TRANSPORT_FAILURE_MESSAGE)
        );
        assert_eq!(client.status(), LexicalStatus::Error);
        assert!(view.rows().is_empty());
    }
}

#[cfg(test)]
mod silent_analysis_tests {
    use super::*;

    #[tokio::test]
    async fn test_silent_updates_panel_only() {
        let lexer = ScriptedLexer::new(lex_error(&["Unexpected token"]));
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        client
            .analyze(&lexer, "plant", true, &mut term, &mut view)
            .await
            .unwrap();

        assert_eq!(term.contents(), "");
        assert!(view.statuses.is_empty());
        assert_eq!(client.status(), LexicalStatus::Unknown);
        assert_eq!(view.renders.len(), 1);
        assert!(!client.latest().unwrap().succeeded());
    }
}

#[cfg(test)]
mod ordering_tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let older = client.issue(true, &mut term);
        let newer = client.issue(true, &mut term);

        let applied = client
            .complete(newer, Ok(lex_ok(plant_program_tokens())), &mut term, &mut view)
            .map(|result| result.sequence);
        assert_eq!(applied, Some(newer.sequence));

        let stale = client.complete(older, Ok(lex_error(&["old"])), &mut term, &mut view);
        assert!(stale.is_none());

        assert_eq!(client.last_applied(), newer.sequence);
        assert!(client.latest().unwrap().succeeded());
        assert_eq!(view.renders.len(), 1);
    }

    #[test]
    fn test_in_order_completions_all_apply() {
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let first = client.issue(true, &mut term);
        let second = client.issue(true, &mut term);
        assert!(second.sequence > first.sequence);

        assert!(client
            .complete(first, Ok(lex_error(&["e"])), &mut term, &mut view)
            .is_some());
        assert!(client
            .complete(second, Ok(lex_ok(Vec::new())), &mut term, &mut view)
            .is_some());
        assert_eq!(view.renders.len(), 2);
        assert!(client.latest().unwrap().succeeded());
    }

    #[test]
    fn test_reset_keeps_numbering() {
        let mut client = client();
        let mut term = MemoryTerminal::new();
        let mut view = RecordingView::new();

        let before = client.issue(false, &mut term);
        client.reset(&mut view);
        let after = client.issue(false, &mut term);

        assert!(client.latest().is_none());
        assert_eq!(client.status(), LexicalStatus::Unknown);
        assert_eq!(view.clears, 1);

        client.complete(after, Ok(lex_ok(Vec::new())), &mut term, &mut view);
        assert!(client
            .complete(before, Ok(lex_error(&["late"])), &mut term, &mut view)
            .is_none());
        assert_eq!(client.status(), LexicalStatus::Ok);
    }
}
