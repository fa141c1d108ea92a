//! Shared test helpers: scripted provider, flaky store, recording view.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use roci_search::agent::{search_assistant, AgentDescriptor};
use roci_search::config::SearchConfig;
use roci_search::context::{Backend, SessionInitializer};
use roci_search::error::SearchError;
use roci_search::provider::{ChunkStream, ModelProvider, ProviderChunk, ProviderRequest};
use roci_search::runner::Runner;
use roci_search::session::{
    InMemorySessionStore, Session, SessionError, SessionId, SessionState, SessionStore,
};
use roci_search::shell::{ChatMessage, ChatView, Frame, ShellState, Sidebar};
use roci_search::types::{Event, FunctionCall, GroundingMetadata};

pub const APP_NAME: &str = "test_app";
pub const USER_ID: &str = "test_user";

/// One step of a scripted reply.
#[derive(Clone)]
pub enum Step {
    Text(&'static str),
    Call(&'static str),
    Grounded(GroundingMetadata),
    /// Mid-stream failure.
    Fail(&'static str),
}

/// How the provider answers one request.
#[derive(Clone)]
pub enum Script {
    /// Refuse before streaming.
    Reject(&'static str),
    Steps(Vec<Step>),
}

impl Script {
    pub fn text(chunks: &[&'static str]) -> Self {
        Self::Steps(chunks.iter().map(|c| Step::Text(*c)).collect())
    }
}

/// Provider that replays queued scripts and records requests.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_scripts(scripts: Vec<Script>) -> Arc<Self> {
        let provider = Self::default();
        provider.scripts.lock().unwrap().extend(scripts);
        Arc::new(provider)
    }

    pub fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn stream_content(&self, request: &ProviderRequest) -> Result<ChunkStream, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::text(&["Mock response"]));

        let steps = match script {
            Script::Reject(message) => return Err(SearchError::api(500, message)),
            Script::Steps(steps) => steps,
        };

        let stream = async_stream::stream! {
            for step in steps {
                match step {
                    Step::Text(text) => {
                        yield Ok(ProviderChunk { text: text.to_string(), ..Default::default() });
                    }
                    Step::Call(name) => {
                        yield Ok(ProviderChunk {
                            function_calls: vec![FunctionCall {
                                name: name.to_string(),
                                args: serde_json::json!({}),
                            }],
                            ..Default::default()
                        });
                    }
                    Step::Grounded(grounding) => {
                        yield Ok(ProviderChunk { grounding: Some(grounding), ..Default::default() });
                    }
                    Step::Fail(message) => {
                        yield Err(SearchError::Stream(message.to_string()));
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

/// In-memory store whose first `failures` creates fail.
pub struct FlakyStore {
    inner: InMemorySessionStore,
    failures: AtomicUsize,
    create_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemorySessionStore::new(),
            failures: AtomicUsize::new(failures),
            create_calls: AtomicUsize::new(0),
        })
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for FlakyStore {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        state: SessionState,
    ) -> Result<Session, SessionError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(SessionError::Unavailable("transient".into()));
        }
        self.inner
            .create_session(app_name, user_id, session_id, state)
            .await
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<Option<Session>, SessionError> {
        self.inner.get_session(app_name, user_id, session_id).await
    }

    async fn append_event(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
        event: Event,
    ) -> Result<(), SessionError> {
        self.inner
            .append_event(app_name, user_id, session_id, event)
            .await
    }
}

pub fn agent() -> Arc<AgentDescriptor> {
    Arc::new(search_assistant(None))
}

pub fn runner(
    provider: Arc<ScriptedProvider>,
    store: Arc<dyn SessionStore>,
) -> Runner {
    Runner::new(agent(), APP_NAME, store, provider)
}

pub fn config() -> SearchConfig {
    SearchConfig::new().with_api_key("test-key")
}

/// Initializer wired to `provider`, with a fresh store per build.
pub fn initializer(config: SearchConfig, provider: Arc<ScriptedProvider>) -> SessionInitializer {
    SessionInitializer::new(config, agent()).with_backend(Box::new(
        move |_: &SearchConfig, _: &AgentDescriptor| -> Result<Backend, SearchError> {
            Ok(Backend {
                store: Arc::new(InMemorySessionStore::new()),
                provider: provider.clone(),
            })
        },
    ))
}

/// Owned copy of one rendered frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub transcript: Vec<ChatMessage>,
    pub state: ShellState,
    pub sidebar: Sidebar,
}

#[derive(Debug, Default)]
struct Recording {
    frames: Vec<Snapshot>,
    errors: Vec<String>,
}

/// View that records frames and errors; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView(Arc<Mutex<Recording>>);

impl RecordingView {
    pub fn frames(&self) -> Vec<Snapshot> {
        self.0.lock().unwrap().frames.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.0.lock().unwrap().errors.clone()
    }
}

impl ChatView for RecordingView {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.0.lock().unwrap().frames.push(Snapshot {
            transcript: frame.transcript.to_vec(),
            state: frame.state,
            sidebar: frame.sidebar.clone(),
        });
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> io::Result<()> {
        self.0.lock().unwrap().errors.push(message.to_string());
        Ok(())
    }
}
