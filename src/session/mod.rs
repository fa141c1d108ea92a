//! Conversation sessions and the store that owns them.

pub mod error;
pub mod id;
pub mod memory;

pub use error::SessionError;
pub use id::SessionId;
pub use memory::InMemorySessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Event;

/// Opaque per-session state.
pub type SessionState = serde_json::Map<String, serde_json::Value>;

/// One conversation for one user of one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub app_name: String,
    pub user_id: String,
    #[serde(default)]
    pub state: SessionState,
    #[serde(default)]
    pub events: Vec<Event>,
    pub last_update_time: DateTime<Utc>,
}

impl Session {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        id: SessionId,
        state: SessionState,
    ) -> Self {
        Self {
            id,
            app_name: app_name.into(),
            user_id: user_id.into(),
            state,
            events: Vec::new(),
            last_update_time: Utc::now(),
        }
    }
}

/// Keyed store of sessions, addressed by (app, user, session id).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a new session. Fails with `AlreadyExists` on a duplicate id.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        state: SessionState,
    ) -> Result<Session, SessionError>;

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<Option<Session>, SessionError>;

    /// Append a non-partial event to a session's history.
    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        event: Event,
    ) -> Result<(), SessionError>;
}
