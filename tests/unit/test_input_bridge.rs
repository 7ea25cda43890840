//! Unit tests for keystroke capture
//!
//! Tests the line editor that answers remote input requests.

use seedbed::terminal::{
    decode_keys, Arrow, CaptureInput, InputBridge, InputResult, KeyInput, LineEnding,
    MemoryTerminal,
};

fn listening(variable: &str) -> (InputBridge, MemoryTerminal) {
    let mut bridge = InputBridge::new(LineEnding::CrLf);
    bridge.begin(variable);
    (bridge, MemoryTerminal::new())
}

#[cfg(test)]
mod capture_tests {
    use super::*;

    #[test]
    fn test_single_capture_per_request() {
        let (mut bridge, mut term) = listening("n");

        assert_eq!(bridge.handle_data("4", &mut term), None);
        assert_eq!(bridge.handle_data("2", &mut term), None);
        let capture = bridge.handle_data("\r", &mut term);

        assert_eq!(
            capture,
            Some(CaptureInput {
                var_name: "n".to_string(),
                input: "42".to_string(),
            })
        );
        assert_eq!(bridge.buffer(), "");
        assert!(!bridge.is_listening());
        assert_eq!(term.contents(), "42\r\n");

        // A second return has nobody to answer
        assert_eq!(bridge.handle_data("\r", &mut term), None);
    }

    #[test]
    fn test_empty_line_is_submitted() {
        let (mut bridge, mut term) = listening("name");
        let capture = bridge.handle_data("\r", &mut term).unwrap();
        assert_eq!(capture.input, "");
        assert_eq!(capture.var_name, "name");
    }

    #[test]
    fn test_keys_after_submit_are_dropped() {
        let (mut bridge, mut term) = listening("a");
        let capture = bridge.handle_data("1\r2", &mut term).unwrap();
        assert_eq!(capture.input, "1");
        assert_eq!(bridge.buffer(), "");
        assert_eq!(term.contents(), "1\r\n");
    }

    #[test]
    fn test_input_without_request_is_ignored() {
        let mut bridge = InputBridge::default();
        let mut term = MemoryTerminal::new();
        assert_eq!(bridge.handle_data("abc\r", &mut term), None);
        assert_eq!(bridge.process_key(KeyInput::Char('x'), &mut term), InputResult::Ignored);
        assert_eq!(term.contents(), "");
    }

    #[test]
    fn test_new_request_replaces_listener() {
        let (mut bridge, mut term) = listening("first");
        bridge.handle_data("abc", &mut term);
        let generation = bridge.generation();

        bridge.begin("second");

        assert!(bridge.generation() > generation);
        assert_eq!(bridge.pending_variable(), Some("second"));
        assert_eq!(bridge.buffer(), "");
        let capture = bridge.handle_data("z\r", &mut term).unwrap();
        assert_eq!(capture.var_name, "second");
        assert_eq!(capture.input, "z");
    }

    #[test]
    fn test_release_discards_buffer() {
        let (mut bridge, mut term) = listening("x");
        bridge.handle_data("12", &mut term);
        bridge.release();
        assert!(!bridge.is_listening());
        assert_eq!(bridge.buffer(), "");
    }

    #[test]
    fn test_lf_line_ending_echo() {
        let mut bridge = InputBridge::new(LineEnding::Lf);
        let mut term = MemoryTerminal::new();
        bridge.begin("v");
        bridge.handle_data("ok\r", &mut term);
        assert_eq!(term.contents(), "ok\n");
    }
}

#[cfg(test)]
mod editing_tests {
    use super::*;

    #[test]
    fn test_backspace_past_empty_buffer() {
        let (mut bridge, mut term) = listening("n");
        bridge.handle_data("42", &mut term);

        bridge.handle_data("\x7f", &mut term);
        bridge.handle_data("\x7f", &mut term);
        let result = bridge.process_key(KeyInput::Backspace, &mut term);

        assert_eq!(result, InputResult::NoOp);
        assert_eq!(bridge.buffer(), "");
        // Only the two real deletions are echoed
        assert_eq!(term.contents(), "42\x08 \x08\x08 \x08");
    }

    #[test]
    fn test_ascii_backspace_is_accepted() {
        let (mut bridge, mut term) = listening("n");
        bridge.handle_data("ab\x08c", &mut term);
        assert_eq!(bridge.buffer(), "ac");
    }

    #[test]
    fn test_arrows_are_ignored() {
        let (mut bridge, mut term) = listening("n");
        bridge.handle_data("a\x1b[A\x1b[B\x1b[C\x1b[Db", &mut term);
        assert_eq!(bridge.buffer(), "ab");
        assert_eq!(term.contents(), "ab");
    }

    #[test]
    fn test_multibyte_characters() {
        let (mut bridge, mut term) = listening("greeting");
        bridge.handle_data("héllo🌱", &mut term);
        bridge.handle_data("\x7f", &mut term);
        let capture = bridge.handle_data("\r", &mut term).unwrap();
        assert_eq!(capture.input, "héllo");
    }

    #[test]
    fn test_decode_keys_partial_escape() {
        assert_eq!(
            decode_keys("\x1b[Z"),
            vec![KeyInput::Char('\x1b'), KeyInput::Char('['), KeyInput::Char('Z')]
        );
        assert_eq!(decode_keys("\x1b[D"), vec![KeyInput::Arrow(Arrow::Left)]);
        assert_eq!(decode_keys("\x1b"), vec![KeyInput::Char('\x1b')]);
    }
}
