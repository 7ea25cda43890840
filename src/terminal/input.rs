//! Keystroke Capture
//!
//! While the remote program waits on a read, the [`InputBridge`] is the one
//! listener on the terminal's keystroke stream. It line-edits into a local
//! buffer, echoes what it accepts, and on carriage return hands back a
//! single [`CaptureInput`] for the session to transmit.

use serde::{Deserialize, Serialize};

use super::output::LineEnding;
use super::TerminalSurface;

/// Arrow keys, recognised so they can be ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Right,
    Left,
}

/// One decoded keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// `ESC [ A..D`
    Arrow(Arrow),
    /// Carriage return
    Submit,
    /// DEL or BS
    Backspace,
    Char(char),
}

/// Decode a terminal data chunk into keystrokes
///
/// Arrow sequences are kept together; everything else is one key per char.
pub fn decode_keys(data: &str) -> Vec<KeyInput> {
    let mut keys = Vec::with_capacity(data.len());
    let mut chars = data.chars().peekable();

    while let Some(ch) = chars.next() {
        let key = match ch {
            '\r' => KeyInput::Submit,
            '\x7f' | '\x08' => KeyInput::Backspace,
            '\x1b' if chars.peek() == Some(&'[') => {
                let mut lookahead = chars.clone();
                lookahead.next();
                let arrow = match lookahead.next() {
                    Some('A') => Some(Arrow::Up),
                    Some('B') => Some(Arrow::Down),
                    Some('C') => Some(Arrow::Right),
                    Some('D') => Some(Arrow::Left),
                    _ => None,
                };
                match arrow {
                    Some(arrow) => {
                        chars.next();
                        chars.next();
                        KeyInput::Arrow(arrow)
                    }
                    None => KeyInput::Char(ch),
                }
            }
            ch => KeyInput::Char(ch),
        };
        keys.push(key);
    }

    keys
}

/// Answer to one pending input request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureInput {
    pub var_name: String,
    pub input: String,
}

/// Outcome of feeding one keystroke to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// No request pending; the key was not consumed
    Ignored,
    /// Key consumed without effect
    NoOp,
    /// Buffer changed
    TextChanged,
    /// Line submitted
    Submitted(CaptureInput),
}

/// Line editor bound to the pending input request
#[derive(Debug)]
pub struct InputBridge {
    /// Variable the remote is waiting on; `Some` while listening
    pending: Option<String>,
    /// Characters typed so far
    buffer: String,
    /// Bumped every time a listener is installed
    generation: u64,
    line_ending: LineEnding,
}

impl InputBridge {
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            pending: None,
            buffer: String::new(),
            generation: 0,
            line_ending,
        }
    }

    /// Install the listener for `variable`, replacing any previous one
    pub fn begin(&mut self, variable: impl Into<String>) -> u64 {
        let variable = variable.into();
        if let Some(previous) = self.pending.replace(variable) {
            debug!("Replacing input listener for '{}'", previous);
        }
        self.buffer.clear();
        self.generation += 1;
        self.generation
    }

    /// Drop the listener without submitting
    pub fn release(&mut self) {
        self.pending = None;
        self.buffer.clear();
    }

    pub fn is_listening(&self) -> bool {
        self.pending.is_some()
    }

    /// Variable the listener answers, if any
    pub fn pending_variable(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Listener generation; changes on every `begin`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one keystroke
    pub fn process_key<T: TerminalSurface + ?Sized>(
        &mut self,
        key: KeyInput,
        term: &mut T,
    ) -> InputResult {
        if self.pending.is_none() {
            return InputResult::Ignored;
        }

        match key {
            KeyInput::Arrow(_) => InputResult::NoOp,
            KeyInput::Backspace => {
                if self.buffer.pop().is_some() {
                    term.echo("\x08 \x08");
                    InputResult::TextChanged
                } else {
                    InputResult::NoOp
                }
            }
            KeyInput::Submit => {
                term.echo(self.line_ending.as_str());
                let var_name = self.pending.take().unwrap_or_default();
                let input = std::mem::take(&mut self.buffer);
                InputResult::Submitted(CaptureInput { var_name, input })
            }
            KeyInput::Char(ch) => {
                self.buffer.push(ch);
                let mut utf8 = [0u8; 4];
                term.echo(ch.encode_utf8(&mut utf8));
                InputResult::TextChanged
            }
        }
    }

    /// Feed a raw terminal data chunk
    ///
    /// Returns the submitted line if the chunk contained a carriage return.
    /// Keys after the submit are dropped: the listener is released at that
    /// point and the terminal belongs to nobody until the next request.
    pub fn handle_data<T: TerminalSurface + ?Sized>(
        &mut self,
        data: &str,
        term: &mut T,
    ) -> Option<CaptureInput> {
        if self.pending.is_none() {
            trace!("Ignoring {} bytes of terminal input, no request pending", data.len());
            return None;
        }

        for key in decode_keys(data) {
            if let InputResult::Submitted(capture) = self.process_key(key, term) {
                return Some(capture);
            }
        }
        None
    }
}

impl Default for InputBridge {
    fn default() -> Self {
        Self::new(LineEnding::default())
    }
}
