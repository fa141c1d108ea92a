//! Gemini model identifiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default model for the search assistant.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Google Gemini models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GoogleModel {
    #[strum(serialize = "gemini-2.5-pro")]
    Gemini25Pro,
    #[strum(serialize = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(serialize = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[strum(serialize = "gemini-2.0-flash")]
    Gemini20Flash,
    #[strum(serialize = "gemini-2.0-flash-exp")]
    Gemini20FlashExp,
    #[strum(serialize = "gemini-1.5-pro")]
    Gemini15Pro,
    #[strum(serialize = "gemini-1.5-flash")]
    Gemini15Flash,
    /// Custom/unknown Google model.
    #[strum(default)]
    Custom(String),
}

impl GoogleModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Gemini20FlashExp => "gemini-2.0-flash-exp",
            Self::Gemini15Pro => "gemini-1.5-pro",
            Self::Gemini15Flash => "gemini-1.5-flash",
            Self::Custom(s) => s,
        }
    }

    /// Gemini 1.x only understands the legacy `google_search_retrieval` tool.
    pub fn uses_legacy_search_tool(&self) -> bool {
        match self {
            Self::Gemini15Pro | Self::Gemini15Flash => true,
            Self::Custom(id) => id.starts_with("gemini-1."),
            _ => false,
        }
    }
}

/// Parse a model identifier, accepting an optional `google:` prefix.
pub fn parse_model(id: &str) -> Result<GoogleModel, crate::error::SearchError> {
    let id = id.trim();
    let id = id.strip_prefix("google:").unwrap_or(id);
    if id.is_empty() {
        return Err(crate::error::SearchError::ModelNotFound(
            "empty model identifier".into(),
        ));
    }
    // `strum(default)` makes this infallible for non-empty input.
    id.parse::<GoogleModel>()
        .map_err(|e| crate::error::SearchError::ModelNotFound(e.to_string()))
}
