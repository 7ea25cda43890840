//! Terminal Surface
//!
//! The terminal is an opaque write-only surface from the core's point of
//! view: something that accepts text, can echo keystrokes and can be
//! cleared. The rendering front end (xterm widget, console, test double)
//! implements [`TerminalSurface`]; keystroke capture and output routing
//! live in the submodules.

pub mod input;
pub mod output;

// Re-exports for convenience
pub use input::{decode_keys, Arrow, CaptureInput, InputBridge, InputResult, KeyInput};
pub use output::{normalize_output, write_line, write_output, LineEnding};

/// A text surface the core writes to
pub trait TerminalSurface {
    /// Write program or status text
    fn write(&mut self, text: &str);

    /// Local echo of user keystrokes
    ///
    /// Surfaces whose input device already echoes (a cooked console)
    /// override this to do nothing.
    fn echo(&mut self, text: &str) {
        self.write(text);
    }

    /// Erase everything shown so far
    fn clear(&mut self);
}

impl<T: TerminalSurface + ?Sized> TerminalSurface for Box<T> {
    fn write(&mut self, text: &str) {
        (**self).write(text)
    }

    fn echo(&mut self, text: &str) {
        (**self).echo(text)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// In-memory terminal keeping everything written since the last clear
#[derive(Debug, Clone, Default)]
pub struct MemoryTerminal {
    contents: String,
    clear_count: usize,
}

impl MemoryTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Return and forget the current contents
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.contents)
    }

    /// Number of times the surface was cleared
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl TerminalSurface for MemoryTerminal {
    fn write(&mut self, text: &str) {
        self.contents.push_str(text);
    }

    fn clear(&mut self) {
        self.contents.clear();
        self.clear_count += 1;
    }
}
