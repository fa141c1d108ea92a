//! Capabilities an agent can enable.
//!
//! Search runs inside the model provider, so a tool here is a declaration
//! serialized into the request rather than code executed locally.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::GoogleModel;

/// A capability reference listed on an agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolSpec {
    /// Google Search grounding.
    GoogleSearch,
}

/// The Google Search grounding tool.
pub fn google_search() -> ToolSpec {
    ToolSpec::GoogleSearch
}

impl ToolSpec {
    /// Gemini `tools[]` entry for this capability.
    pub fn declaration(&self, model: &GoogleModel) -> serde_json::Value {
        match self {
            Self::GoogleSearch if model.uses_legacy_search_tool() => {
                serde_json::json!({ "google_search_retrieval": {} })
            }
            Self::GoogleSearch => serde_json::json!({ "google_search": {} }),
        }
    }
}
