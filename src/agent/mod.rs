//! Agent descriptor: the declarative half of the assistant.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_MODEL;
use crate::tools::{google_search, ToolSpec};

pub const SEARCH_ASSISTANT_NAME: &str = "search_assistant";
pub const SEARCH_ASSISTANT_DESCRIPTION: &str = "An assistant that can search the web.";
pub const SEARCH_ASSISTANT_INSTRUCTION: &str =
    "You are a helpful assistant. Answer user questions using Google Search when needed.";

/// Immutable description of one conversational agent.
///
/// Fields are private; build once with [`AgentDescriptor::builder`] and
/// share behind an `Arc`.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
#[builder(on(String, into))]
pub struct AgentDescriptor {
    name: String,
    model: String,
    instruction: String,
    #[builder(default)]
    description: String,
    #[builder(default)]
    tools: Vec<ToolSpec>,
}

impl AgentDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }
}

/// The web-search assistant, on `model` or the default Gemini model.
pub fn search_assistant(model: Option<&str>) -> AgentDescriptor {
    AgentDescriptor::builder()
        .name(SEARCH_ASSISTANT_NAME)
        .model(model.unwrap_or(DEFAULT_MODEL))
        .instruction(SEARCH_ASSISTANT_INSTRUCTION)
        .description(SEARCH_ASSISTANT_DESCRIPTION)
        .tools(vec![google_search()])
        .build()
}
