//! Output Routing
//!
//! Remote program output arrives as raw text chunks. They are written to
//! the terminal verbatim except for line boundaries, which are rewritten
//! to the terminal's own line-ending convention.

use serde::{Deserialize, Serialize};

use super::TerminalSurface;

/// Line-ending convention of a terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Carriage return + line feed (xterm-style surfaces)
    #[default]
    CrLf,
    /// Bare line feed
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Rewrite every `\r\n` and lone `\n` in `chunk` to `ending`
///
/// No line ending is appended: a chunk that does not end in a newline
/// stays open so the next chunk continues the same line.
pub fn normalize_output(chunk: &str, ending: LineEnding) -> String {
    if !chunk.contains('\n') {
        return chunk.to_string();
    }

    let mut normalized = String::with_capacity(chunk.len() + chunk.len() / 8);
    let mut segments = chunk.split('\n').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_some() {
            normalized.push_str(segment.strip_suffix('\r').unwrap_or(segment));
            normalized.push_str(ending.as_str());
        } else {
            normalized.push_str(segment);
        }
    }
    normalized
}

/// Write a remote output chunk
pub fn write_output<T: TerminalSurface + ?Sized>(term: &mut T, chunk: &str, ending: LineEnding) {
    if chunk.is_empty() {
        return;
    }
    term.write(&normalize_output(chunk, ending));
}

/// Write `text` followed by a line ending
pub fn write_line<T: TerminalSurface + ?Sized>(term: &mut T, text: &str, ending: LineEnding) {
    let mut line = normalize_output(text, ending);
    line.push_str(ending.as_str());
    term.write(&line);
}
