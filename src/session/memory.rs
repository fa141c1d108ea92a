//! Process-local session store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Session, SessionError, SessionId, SessionState, SessionStore};
use crate::types::Event;

type SessionKey = (String, String, SessionId);

/// Sessions held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn key(app_name: &str, user_id: &str, session_id: &SessionId) -> SessionKey {
    (app_name.to_string(), user_id.to_string(), session_id.clone())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        state: SessionState,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;
        let key = key(app_name, user_id, session_id);
        if sessions.contains_key(&key) {
            return Err(SessionError::AlreadyExists(session_id.to_string()));
        }
        let session = Session::new(app_name, user_id, session_id.clone(), state);
        sessions.insert(key, session.clone());
        tracing::debug!(app_name, user_id, session_id = %session_id, "session created");
        Ok(session)
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&key(app_name, user_id, session_id)).cloned())
    }

    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        event: Event,
    ) -> Result<(), SessionError> {
        if event.partial {
            return Ok(());
        }
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&key(app_name, user_id, session_id))
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.last_update_time = Utc::now();
        session.events.push(event);
        Ok(())
    }
}
