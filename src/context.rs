//! Session initialization and the per-process chat context.

use std::sync::Arc;

use crate::agent::AgentDescriptor;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::provider::{create_provider, ModelProvider};
use crate::runner::Runner;
use crate::session::{
    InMemorySessionStore, Session, SessionError, SessionId, SessionState, SessionStore,
};
use crate::turn;
use crate::util::retry::RetryPolicy;

/// Builds the store and provider a context runs on.
pub type BackendFactory =
    Box<dyn Fn(&SearchConfig, &AgentDescriptor) -> Result<Backend> + Send + Sync>;

/// Store and provider pair backing a [`Runner`].
pub struct Backend {
    pub store: Arc<dyn SessionStore>,
    pub provider: Arc<dyn ModelProvider>,
}

/// In-memory sessions and the Gemini provider for the agent's model.
pub fn default_backend(config: &SearchConfig, agent: &AgentDescriptor) -> Result<Backend> {
    Ok(Backend {
        store: Arc::new(InMemorySessionStore::new()),
        provider: Arc::from(create_provider(agent.model(), config)?),
    })
}

/// A runner bound to one registered session.
#[derive(Debug, Clone)]
pub struct ChatContext {
    runner: Runner,
    user_id: String,
    session_id: SessionId,
}

impl ChatContext {
    /// Register `session_id` with the runner's store and wrap the result.
    pub async fn initialize(
        runner: Runner,
        user_id: impl Into<String>,
        session_id: SessionId,
    ) -> Result<Self> {
        let user_id = user_id.into();
        register_session(
            runner.session_store().as_ref(),
            runner.app_name(),
            &user_id,
            &session_id,
        )
        .await?;
        Ok(Self {
            runner,
            user_id,
            session_id,
        })
    }

    /// One turn; see [`turn::ask`].
    pub async fn ask(&self, query: &str) -> String {
        turn::ask(&self.runner, &self.user_id, &self.session_id, query).await
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// Create a session, retrying once immediately on any failure.
///
/// A duplicate id surfaces as `SessionError::AlreadyExists` if the retry
/// hits it; it is not treated as success.
pub async fn register_session(
    store: &dyn SessionStore,
    app_name: &str,
    user_id: &str,
    session_id: &SessionId,
) -> std::result::Result<Session, SessionError> {
    RetryPolicy::immediate_once()
        .execute_if(
            move || store.create_session(app_name, user_id, session_id, SessionState::new()),
            |_| true,
        )
        .await
}

/// Lazily builds and memoizes the [`ChatContext`] for a process.
///
/// The session id is assigned once and survives [`invalidate`](Self::invalidate);
/// only the runner and its store are rebuilt.
pub struct SessionInitializer {
    config: SearchConfig,
    agent: Arc<AgentDescriptor>,
    backend: BackendFactory,
    session_id: Option<SessionId>,
    context: Option<ChatContext>,
}

impl SessionInitializer {
    pub fn new(config: SearchConfig, agent: Arc<AgentDescriptor>) -> Self {
        Self {
            config,
            agent,
            backend: Box::new(default_backend),
            session_id: None,
            context: None,
        }
    }

    pub fn with_backend(mut self, backend: BackendFactory) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    /// The id assigned so far, if any.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    /// The cached context, building it on first use.
    pub async fn get_or_create(&mut self) -> Result<&ChatContext> {
        let context = match self.context.take() {
            Some(context) => context,
            None => self.build().await?,
        };
        let context: &ChatContext = self.context.insert(context);
        Ok(context)
    }

    /// Drop the cached context; the next [`get_or_create`](Self::get_or_create)
    /// rebuilds it under the same session id.
    pub fn invalidate(&mut self) {
        self.context = None;
    }

    async fn build(&mut self) -> Result<ChatContext> {
        let session_id = self
            .session_id
            .get_or_insert_with(SessionId::generate)
            .clone();
        let Backend { store, provider } = (self.backend)(&self.config, &*self.agent)?;
        let runner = Runner::new(
            Arc::clone(&self.agent),
            self.config.app_name(),
            store,
            provider,
        );
        tracing::debug!(session_id = %session_id, model = self.agent.model(), "initializing chat context");
        ChatContext::initialize(runner, self.config.user_id(), session_id).await
    }
}
