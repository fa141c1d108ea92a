//! Google Gemini API provider.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::SearchError;
use crate::models::GoogleModel;
use crate::types::{FunctionCall, GroundingMetadata, GroundingSource};
use crate::util::retry::RetryPolicy;

use super::http::{parse_sse_data, shared_client, status_to_error, SseLineBuffer};
use super::{ChunkStream, ModelProvider, ProviderChunk, ProviderRequest, Usage};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: String,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl GoogleProvider {
    pub fn new(model: GoogleModel, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Point the provider at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Policy for opening the stream; only retryable errors are retried.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("contents".into(), serde_json::json!(request.contents));

        if let Some(ref sys) = request.system_instruction {
            body.insert(
                "systemInstruction".into(),
                serde_json::json!({ "parts": [{ "text": sys }] }),
            );
        }

        if !request.tools.is_empty() {
            let tools: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|tool| tool.declaration(&self.model))
                .collect();
            body.insert("tools".into(), serde_json::Value::Array(tools));
        }

        serde_json::Value::Object(body)
    }

    async fn open_stream(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, SearchError> {
        let resp = shared_client().post(url).json(body).send().await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn stream_content(&self, request: &ProviderRequest) -> Result<ChunkStream, SearchError> {
        let body = self.build_request_body(request);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url,
            self.model.as_str(),
            self.api_key
        );

        debug!(model = self.model.as_str(), "Google stream_content");

        let resp = self
            .retry_policy
            .execute_if(|| self.open_stream(&url, &body), SearchError::is_retryable)
            .await?;

        Ok(decode_stream(resp.bytes_stream()))
    }
}

/// Turn a raw SSE byte stream into provider chunks.
///
/// The first error ends the stream.
fn decode_stream<S, B>(byte_stream: S) -> ChunkStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut lines = SseLineBuffer::default();
        futures::pin_mut!(byte_stream);

        'read: while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(SearchError::Network(e));
                    break;
                }
            };

            lines.extend(chunk.as_ref());

            while let Some(line) = lines.next_line() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        break 'read;
                    }
                };

                let Some(data) = parse_sse_data(&line) else { continue; };
                let parsed = serde_json::from_str::<GeminiResponse>(data)
                    .map_err(SearchError::Serialization)
                    .and_then(chunk_from_response);
                match parsed {
                    Ok(Some(chunk)) => {
                        yield Ok(chunk);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        break 'read;
                    }
                }
            }
        }
    };

    Box::pin(stream)
}

/// Convert one `GenerateContentResponse` into a chunk.
fn chunk_from_response(resp: GeminiResponse) -> Result<Option<ProviderChunk>, SearchError> {
    let usage = resp.usage_metadata.map(|u| Usage {
        input_tokens: u.prompt_token_count,
        output_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SearchError::Stream(format!("prompt blocked: {reason}")));
        }
        return Ok(usage.map(|usage| ProviderChunk {
            usage: Some(usage),
            ..Default::default()
        }));
    };

    let mut chunk = ProviderChunk {
        usage,
        ..Default::default()
    };

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if part.thought {
            continue;
        }
        if let Some(t) = part.text {
            chunk.text.push_str(&t);
        }
        if let Some(fc) = part.function_call {
            chunk.function_calls.push(fc);
        }
    }

    chunk.grounding = candidate
        .grounding_metadata
        .map(|g| GroundingMetadata {
            web_search_queries: g.web_search_queries,
            sources: g
                .grounding_chunks
                .into_iter()
                .filter_map(|c| c.web)
                .map(|web| GroundingSource {
                    uri: web.uri,
                    title: web.title,
                })
                .collect(),
        })
        .filter(|g| !g.is_empty());

    Ok(Some(chunk))
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    grounding_metadata: Option<GeminiGrounding>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<FunctionCall>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGrounding {
    #[serde(default)]
    web_search_queries: Vec<String>,
    #[serde(default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Deserialize)]
struct GeminiGroundingChunk {
    web: Option<GeminiWebSource>,
}

#[derive(Deserialize)]
struct GeminiWebSource {
    uri: String,
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
