//! Chat shell: transcript, idle/busy state and the blocking turn bridge.

pub mod view;

pub use view::{ChatView, Frame, Sidebar, TerminalView};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::agent::search_assistant;
use crate::config::{SearchConfig, API_KEY_ENV_VARS};
use crate::context::SessionInitializer;
use crate::error::{Result, SearchError};

pub const TITLE: &str = "🔍 Search Assistant";
pub const BUSY_LABEL: &str = "Searching...";
pub const INPUT_PLACEHOLDER: &str = "Ask anything...";
pub const MISSING_KEY_MESSAGE: &str =
    "API Key missing! Add GOOGLE_API_KEY to your environment or .env file.";

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Busy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    /// Show the trailing characters of the session id in the sidebar.
    pub show_session: bool,
}

/// Drives the chat UI over a [`ChatView`].
///
/// Owns a current-thread runtime; each submission blocks on exactly one
/// turn, so there is never more than one query in flight.
pub struct ChatShell<V: ChatView> {
    runtime: Runtime,
    initializer: SessionInitializer,
    view: V,
    options: ShellOptions,
    transcript: Vec<ChatMessage>,
    state: ShellState,
}

impl<V: ChatView> ChatShell<V> {
    /// Start the search assistant described by `config`.
    pub fn start(config: SearchConfig, options: ShellOptions, view: V) -> Result<Self> {
        let agent = Arc::new(search_assistant(Some(config.model())));
        Self::start_with(SessionInitializer::new(config, agent), options, view)
    }

    /// Start over a prepared initializer.
    ///
    /// Halts with an error frame, before any input is accepted, when the
    /// credential is missing or the session cannot be registered.
    pub fn start_with(
        mut initializer: SessionInitializer,
        options: ShellOptions,
        mut view: V,
    ) -> Result<Self> {
        if !initializer.config().has_credentials() {
            view.render_error(MISSING_KEY_MESSAGE)?;
            return Err(SearchError::MissingCredential(API_KEY_ENV_VARS[0].to_string()));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        if let Err(err) = runtime.block_on(initializer.get_or_create()) {
            tracing::error!(error = %err, "chat context initialization failed");
            view.render_error(&format!("Initialization failed: {err}"))?;
            return Err(err);
        }

        let mut shell = Self {
            runtime,
            initializer,
            view,
            options,
            transcript: Vec::new(),
            state: ShellState::Idle,
        };
        shell.render()?;
        Ok(shell)
    }

    /// Run one turn for `prompt` and return the assistant's entry.
    ///
    /// Blank input is ignored and returns `Ok(None)`.
    pub fn submit(&mut self, prompt: &str) -> Result<Option<&ChatMessage>> {
        if prompt.trim().is_empty() {
            return Ok(None);
        }

        self.transcript.push(ChatMessage::user(prompt));
        self.state = ShellState::Busy;
        self.render()?;

        let reply = match self.runtime.block_on(self.initializer.get_or_create()) {
            Ok(context) => self.runtime.block_on(context.ask(prompt)),
            Err(err) => {
                self.state = ShellState::Idle;
                self.view
                    .render_error(&format!("Initialization failed: {err}"))?;
                return Err(err);
            }
        };

        self.transcript.push(ChatMessage::assistant(reply));
        self.state = ShellState::Idle;
        self.render()?;
        Ok(self.transcript.last())
    }

    /// Clear the transcript. The session and its history are kept.
    pub fn reset(&mut self) -> Result<()> {
        self.transcript.clear();
        self.render()
    }

    /// Drop the cached runner; it is rebuilt on the next turn.
    pub fn invalidate_context(&mut self) {
        self.initializer.invalidate();
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session_id(&self) -> Option<&crate::session::SessionId> {
        self.initializer.session_id()
    }

    fn render(&mut self) -> Result<()> {
        let sidebar = Sidebar {
            model: self.initializer.agent().model().to_string(),
            session_suffix: self
                .options
                .show_session
                .then(|| self.initializer.session_id())
                .flatten()
                .map(|id| id.suffix(8).to_string()),
        };
        let frame = Frame {
            title: TITLE,
            transcript: &self.transcript,
            state: self.state,
            sidebar,
        };
        self.view.render(&frame)?;
        Ok(())
    }
}
