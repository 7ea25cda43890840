//! Contract tests for the execution session
//!
//! These tests verify the session lifecycle against the events the
//! execution service emits and the keystrokes the user types.

use seedbed::config::TerminalConfig;
use seedbed::error::Error;
use seedbed::execution::{ExecutionSession, LAUNCH_FAILURE_MESSAGE};
use seedbed::models::SessionState;
use seedbed::remote::{ClientMessage, RunResponse, ServerEvent};
use seedbed::terminal::{CaptureInput, MemoryTerminal};

fn session() -> ExecutionSession {
    ExecutionSession::new(&TerminalConfig::default())
}

fn streaming_session() -> ExecutionSession {
    ExecutionSession::new(&TerminalConfig::default()).with_complete_on_response(false)
}

fn input_required(variable: &str, prompt: &str) -> ServerEvent {
    ServerEvent::InputRequired {
        prompt: prompt.to_string(),
        variable: variable.to_string(),
    }
}

fn accepted() -> RunResponse {
    RunResponse {
        success: true,
        errors: Vec::new(),
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_begin_run_from_idle() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);

        let id = session.begin_run().unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.session_id(), Some(id));
        assert!(session.started_at().is_some());
    }

    #[test]
    fn test_second_run_while_active_is_busy() {
        let mut session = session();
        let id = session.begin_run().unwrap();

        let err = session.begin_run().unwrap_err();

        assert!(matches!(err, Error::SessionBusy { ref session_id } if *session_id == id.to_string()));
        assert_eq!(session.session_id(), Some(id));
    }

    #[test]
    fn test_accepted_launch_completes() {
        let mut session = session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        session.apply_launch(Ok(accepted()), &mut term);

        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.state().is_finished());
    }

    #[test]
    fn test_rejected_launch_writes_errors() {
        let mut session = session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        let response = RunResponse {
            success: false,
            errors: vec!["Runtime error: division by zero".to_string()],
        };
        session.apply_launch(Ok(response), &mut term);

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(term.contents(), "Runtime error: division by zero\r\n");
    }

    #[test]
    fn test_launch_transport_failure() {
        let mut session = session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        let err = Error::RunLaunchFailed {
            endpoint: "http://localhost:5000/api/output".to_string(),
            reason: "HTTP error! status: 500".to_string(),
        };
        session.apply_launch(Err(err), &mut term);

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(term.contents(), format!("{}\r\n", LAUNCH_FAILURE_MESSAGE));
    }

    #[test]
    fn test_new_run_after_finish() {
        let mut session = session();
        let mut term = MemoryTerminal::new();
        let first = session.begin_run().unwrap();
        session.apply_launch(Ok(accepted()), &mut term);

        let second = session.begin_run().unwrap();

        assert_ne!(first, second);
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.captured_inputs(), 0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();
        session.apply(input_required("n", ""), &mut term);
        session.handle_terminal_data("4", &mut term);

        session.reset(&mut term);

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.session_id().is_none());
        assert!(session.pending_variable().is_none());
        assert_eq!(session.input_buffer(), "");
        assert_eq!(term.contents(), "");
        assert_eq!(term.clear_count(), 1);
    }
}

#[cfg(test)]
mod event_tests {
    use super::*;

    #[test]
    fn test_output_is_normalized() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        assert!(session.apply(
            ServerEvent::Output {
                output: "Hello\nWorld\n".to_string()
            },
            &mut term
        ));

        assert_eq!(term.contents(), "Hello\r\nWorld\r\n");
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_events_without_session_are_ignored() {
        let mut session = session();
        let mut term = MemoryTerminal::new();

        assert!(!session.apply(
            ServerEvent::Output {
                output: "stray".to_string()
            },
            &mut term
        ));
        assert!(!session.apply(input_required("n", ""), &mut term));

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(term.contents(), "");
    }

    #[test]
    fn test_late_output_after_completion_is_shown() {
        let mut session = session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();
        session.apply_launch(Ok(accepted()), &mut term);

        assert!(session.apply(
            ServerEvent::Output {
                output: "tail".to_string()
            },
            &mut term
        ));
        assert!(!session.apply(input_required("late", ""), &mut term));

        assert_eq!(term.contents(), "tail");
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_run_finished_event() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();
        session.apply_launch(Ok(accepted()), &mut term);
        assert_eq!(session.state(), SessionState::Running);

        assert!(session.apply(ServerEvent::RunFinished {}, &mut term));
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_run_failed_event() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        session.apply(
            ServerEvent::RunFailed {
                errors: vec!["Undefined variable 'y'".to_string()],
            },
            &mut term,
        );

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(term.contents(), "Undefined variable 'y'\r\n");
    }

    #[test]
    fn test_prompt_echo_is_configurable() {
        let config = TerminalConfig {
            echo_prompt: true,
            ..TerminalConfig::default()
        };
        let mut session = ExecutionSession::new(&config);
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        session.apply(input_required("n", "Enter n: "), &mut term);

        assert_eq!(term.contents(), "Enter n: ");
        assert_eq!(session.pending_prompt(), Some("Enter n: "));

        let mut quiet = streaming_session();
        let mut quiet_term = MemoryTerminal::new();
        quiet.begin_run().unwrap();
        quiet.apply(input_required("n", "Enter n: "), &mut quiet_term);
        assert_eq!(quiet_term.contents(), "");
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_input_round_trip() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();
        session.apply(input_required("n", ""), &mut term);
        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert_eq!(session.pending_variable(), Some("n"));

        assert!(session.handle_terminal_data("4", &mut term).is_none());
        assert!(session.handle_terminal_data("2", &mut term).is_none());
        assert_eq!(session.input_buffer(), "42");
        let message = session.handle_terminal_data("\r", &mut term);

        assert_eq!(
            message,
            Some(ClientMessage::CaptureInput(CaptureInput {
                var_name: "n".to_string(),
                input: "42".to_string(),
            }))
        );
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.input_buffer(), "");
        assert_eq!(session.captured_inputs(), 1);
        assert!(session.handle_terminal_data("\r", &mut term).is_none());
    }

    #[test]
    fn test_keystrokes_while_running_are_ignored() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        assert!(session.handle_terminal_data("abc\r", &mut term).is_none());
        assert_eq!(term.contents(), "");
    }

    #[test]
    fn test_sequential_requests() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();

        let mut answers = Vec::new();
        for (variable, typed) in [("a", "1\r"), ("b", "2\r")] {
            session.apply(input_required(variable, ""), &mut term);
            if let Some(ClientMessage::CaptureInput(capture)) =
                session.handle_terminal_data(typed, &mut term)
            {
                answers.push((capture.var_name, capture.input));
            }
        }

        assert_eq!(
            answers,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
        assert_eq!(session.captured_inputs(), 2);
    }

    #[test]
    fn test_failure_releases_listener() {
        let mut session = streaming_session();
        let mut term = MemoryTerminal::new();
        session.begin_run().unwrap();
        session.apply(input_required("n", ""), &mut term);

        session.fail(&["Connection lost".to_string()], &mut term);

        assert_eq!(session.state(), SessionState::Failed);
        assert!(session.pending_variable().is_none());
        assert!(session.handle_terminal_data("1\r", &mut term).is_none());
    }
}
