//! Rendering surface for the chat shell.

use std::io::{self, Write};

use super::{ChatMessage, ChatRole, ShellState, BUSY_LABEL, INPUT_PLACEHOLDER};

/// Side panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub model: String,
    pub session_suffix: Option<String>,
}

/// Everything needed to draw the page from scratch.
#[derive(Debug)]
pub struct Frame<'a> {
    pub title: &'a str,
    pub transcript: &'a [ChatMessage],
    pub state: ShellState,
    pub sidebar: Sidebar,
}

/// A surface the shell redraws after every interaction.
pub trait ChatView {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;

    /// Blocking error that replaces the page.
    fn render_error(&mut self, message: &str) -> io::Result<()>;
}

/// Plain-text view over any writer.
pub struct TerminalView<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    /// Clear the terminal before each frame.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        writeln!(self.out, "{}", frame.title)?;
        write!(self.out, "Model: {}", frame.sidebar.model)?;
        if let Some(ref suffix) = frame.sidebar.session_suffix {
            write!(self.out, " | Session: ...{suffix}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", "-".repeat(40))?;

        for message in frame.transcript {
            let label = match message.role {
                ChatRole::User => "You",
                ChatRole::Assistant => "Assistant",
            };
            writeln!(self.out, "{label}: {}", message.content)?;
        }

        match frame.state {
            ShellState::Busy => writeln!(self.out, "{BUSY_LABEL}")?,
            ShellState::Idle => writeln!(self.out, "{INPUT_PLACEHOLDER}")?,
        }
        self.out.flush()
    }

    fn render_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "❌ {message}")?;
        self.out.flush()
    }
}
