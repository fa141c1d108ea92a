//! Runner: drives one conversational turn against a session.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use uuid::Uuid;

use crate::agent::AgentDescriptor;
use crate::error::SearchError;
use crate::provider::{ChunkStream, ModelProvider, ProviderRequest, Usage};
use crate::session::{SessionError, SessionId, SessionStore};
use crate::types::{Content, Event, GroundingMetadata, Part, Role};

/// Lazy sequence of events produced by one turn.
pub type EventStream = BoxStream<'static, Result<Event, SearchError>>;

/// Binds an agent to a session store and a model provider.
#[derive(Clone)]
pub struct Runner {
    agent: Arc<AgentDescriptor>,
    app_name: String,
    session_store: Arc<dyn SessionStore>,
    provider: Arc<dyn ModelProvider>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("agent", &self.agent.name())
            .field("app_name", &self.app_name)
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .finish()
    }
}

/// Everything the streaming half of a turn needs.
struct TurnScope {
    invocation_id: String,
    author: String,
    app_name: String,
    user_id: String,
    session_id: SessionId,
    store: Arc<dyn SessionStore>,
}

impl Runner {
    pub fn new(
        agent: Arc<AgentDescriptor>,
        app_name: impl Into<String>,
        session_store: Arc<dyn SessionStore>,
        provider: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            agent,
            app_name: app_name.into(),
            session_store,
            provider,
        }
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session_store
    }

    /// Run one turn. Nothing happens until the returned stream is polled.
    ///
    /// Yields partial events while the model streams, then exactly one
    /// non-partial event carrying the whole reply. Any failure ends the
    /// stream with an `Err` item.
    pub fn run_async(
        &self,
        user_id: &str,
        session_id: &SessionId,
        new_message: Content,
    ) -> EventStream {
        let scope = TurnScope {
            invocation_id: format!("e-{}", Uuid::new_v4()),
            author: self.agent.name().to_string(),
            app_name: self.app_name.clone(),
            user_id: user_id.to_string(),
            session_id: session_id.clone(),
            store: Arc::clone(&self.session_store),
        };
        let agent = Arc::clone(&self.agent);
        let provider = Arc::clone(&self.provider);

        let stream = async_stream::stream! {
            let mut chunks = match start_turn(&scope, &agent, provider.as_ref(), new_message).await {
                Ok(chunks) => chunks,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut text = String::new();
            let mut parts = Vec::new();
            let mut grounding = GroundingMetadata::default();
            let mut usage = Usage::default();

            while let Some(chunk) = chunks.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                if !chunk.text.is_empty() {
                    text.push_str(&chunk.text);
                    yield Ok(Event::new(&scope.invocation_id, &scope.author)
                        .with_content(Content::model(chunk.text))
                        .partial());
                }
                parts.extend(chunk.function_calls.into_iter().map(|call| Part {
                    text: None,
                    function_call: Some(call),
                }));
                if let Some(g) = chunk.grounding {
                    grounding.merge(g);
                }
                if let Some(u) = chunk.usage {
                    usage = u;
                }
            }

            if !text.is_empty() {
                parts.insert(0, Part::text(text));
            }
            let mut event = Event::new(&scope.invocation_id, &scope.author);
            if !parts.is_empty() {
                event.content = Some(Content { role: Role::Model, parts });
            }
            if !grounding.is_empty() {
                event.grounding = Some(grounding);
            }
            event.turn_complete = true;

            if let Err(e) = scope
                .store
                .append_event(&scope.app_name, &scope.user_id, &scope.session_id, event.clone())
                .await
            {
                yield Err(e.into());
                return;
            }

            tracing::debug!(
                invocation_id = %scope.invocation_id,
                session_id = %scope.session_id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "turn complete"
            );
            yield Ok(event);
        };

        Box::pin(stream)
    }
}

/// Record the user message and open the model stream.
async fn start_turn(
    scope: &TurnScope,
    agent: &AgentDescriptor,
    provider: &dyn ModelProvider,
    new_message: Content,
) -> Result<ChunkStream, SearchError> {
    let session = scope
        .store
        .get_session(&scope.app_name, &scope.user_id, &scope.session_id)
        .await?
        .ok_or_else(|| SessionError::NotFound(scope.session_id.to_string()))?;

    let mut contents = history(&session.events);
    contents.push(new_message.clone());

    let user_event = Event::new(&scope.invocation_id, "user").with_content(new_message);
    scope
        .store
        .append_event(&scope.app_name, &scope.user_id, &scope.session_id, user_event)
        .await?;

    let request = ProviderRequest {
        system_instruction: Some(agent.instruction().to_string())
            .filter(|instruction| !instruction.is_empty()),
        contents,
        tools: agent.tools().to_vec(),
    };

    tracing::debug!(
        invocation_id = %scope.invocation_id,
        model = provider.model_id(),
        history = request.contents.len(),
        "turn start"
    );
    provider.stream_content(&request).await
}

/// Prior turns as model input, oldest first.
fn history(events: &[Event]) -> Vec<Content> {
    events
        .iter()
        .filter(|event| !event.partial && event.error_message.is_none())
        .filter_map(|event| event.content.clone())
        .filter(|content| content.parts.iter().any(|part| part.text.is_some()))
        .collect()
}
