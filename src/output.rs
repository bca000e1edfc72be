// src/output.rs

//! Shared output sink and ANSI color handling.
//!
//! Every user-facing line (child stdout/stderr and orchestrator status
//! messages) goes through [`OutputSink`]. Lines are fully formatted before a
//! single write, so concurrent writers never interleave partial lines. ANSI
//! sequences already present in child output are passed through untouched.

use std::io::IsTerminal;
use std::sync::{Arc, Mutex};

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const PURPLE: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Out,
    Err,
}

impl StreamKind {
    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Out => "out",
            StreamKind::Err => "err",
        }
    }

    /// When color is enabled the stream kind is omitted from the prefix text;
    /// the color alone disambiguates stdout from stderr.
    fn color(self) -> &'static str {
        match self {
            StreamKind::Out => GREEN,
            StreamKind::Err => RED,
        }
    }
}

/// Class of an orchestrator status message, mapped to a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Info,
    Success,
    Warning,
    Error,
    /// Environment-override announcements.
    Note,
}

impl StatusClass {
    fn color(self) -> &'static str {
        match self {
            StatusClass::Info => CYAN,
            StatusClass::Success => GREEN,
            StatusClass::Warning => YELLOW,
            StatusClass::Error => RED,
            StatusClass::Note => PURPLE,
        }
    }
}

#[derive(Debug, Clone)]
enum Target {
    Stdout,
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Cheap cloneable handle to the shared line-oriented output sink.
///
/// The production target is stdout; tests use [`OutputSink::memory`] to
/// capture lines instead.
#[derive(Debug, Clone)]
pub struct OutputSink {
    target: Target,
    color: bool,
}

impl OutputSink {
    pub fn stdout(color: bool) -> Self {
        Self {
            target: Target::Stdout,
            color,
        }
    }

    /// Sink writing into a shared in-memory buffer, for tests.
    pub fn memory(color: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            target: Target::Memory(Arc::clone(&buffer)),
            color,
        };
        (sink, buffer)
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Write one line of child output.
    ///
    /// Colorless: `[<tag>:<out|err>] <line>`. Colored: the tag prefix is
    /// painted in the stream's color and the line follows after a reset.
    pub fn line(&self, tag: &str, kind: StreamKind, line: &str) {
        let formatted = if self.color {
            format!("{}[{}] {}{}", kind.color(), tag, RESET, line)
        } else {
            format!("[{}:{}] {}", tag, kind.label(), line)
        };
        self.write(formatted);
    }

    /// Write a tag-prefixed status message.
    pub fn status(&self, tag: &str, class: StatusClass, message: &str) {
        self.message(class, &format!("[{}] {}", tag, message));
    }

    /// Write an untagged orchestrator notice (signal handling and the like).
    pub fn notice(&self, class: StatusClass, message: &str) {
        self.message(class, message);
    }

    fn message(&self, class: StatusClass, text: &str) {
        let formatted = if self.color {
            format!("{}{}{}", class.color(), text, RESET)
        } else {
            text.to_string()
        };
        self.write(formatted);
    }

    fn write(&self, line: String) {
        match &self.target {
            // `println!` locks stdout for the whole call, so a fully formatted
            // line is written atomically with respect to other writers.
            Target::Stdout => println!("{line}"),
            Target::Memory(buffer) => buffer.lock().unwrap().push(line),
        }
    }
}

/// Whether stdout should receive colored output.
///
/// Color is on iff it was not disabled on the command line, the `NO_COLOR`
/// environment variable is unset, and stdout is a terminal.
pub fn detect_color_support(no_color_flag: bool) -> bool {
    !no_color_flag
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal()
}
