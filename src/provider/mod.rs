//! Model provider trait and the Gemini implementation.

pub mod google;
pub mod http;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::parse_model;
use crate::tools::ToolSpec;
use crate::types::{Content, FunctionCall, GroundingMetadata};

/// A request sent to a model provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub tools: Vec<ToolSpec>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// One streamed increment of a model reply.
#[derive(Debug, Clone, Default)]
pub struct ProviderChunk {
    pub text: String,
    pub function_calls: Vec<FunctionCall>,
    pub grounding: Option<GroundingMetadata>,
    pub usage: Option<Usage>,
}

pub type ChunkStream = BoxStream<'static, Result<ProviderChunk, SearchError>>;

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Stream a reply. Errors before the first byte are returned directly;
    /// errors mid-stream arrive as stream items.
    async fn stream_content(&self, request: &ProviderRequest) -> Result<ChunkStream, SearchError>;
}

/// Create the provider serving `model`, using the configured credential.
pub fn create_provider(
    model: &str,
    config: &SearchConfig,
) -> Result<Box<dyn ModelProvider>, SearchError> {
    let model = parse_model(model)?;
    let api_key = config.require_api_key()?.to_string();
    let mut provider = google::GoogleProvider::new(model, api_key);
    if let Some(url) = config.base_url() {
        provider = provider.with_base_url(url);
    }
    Ok(Box::new(provider))
}
