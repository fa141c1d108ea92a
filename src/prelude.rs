//! Convenience re-exports for common use.

pub use crate::agent::{search_assistant, AgentDescriptor};
pub use crate::config::SearchConfig;
pub use crate::context::{ChatContext, SessionInitializer};
pub use crate::error::{Result, SearchError};
pub use crate::provider::ModelProvider;
pub use crate::runner::Runner;
pub use crate::session::{InMemorySessionStore, SessionId, SessionStore};
pub use crate::shell::{ChatShell, ChatView, ShellOptions, TerminalView};
pub use crate::tools::{google_search, ToolSpec};
pub use crate::turn::{ask, NO_RESPONSE};
pub use crate::types::{Content, Event, Part, Role};
