//! Configuration (layered: code > env > config file > defaults).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::models::DEFAULT_MODEL;

pub const DEFAULT_APP_NAME: &str = "search_assistant_app";
pub const DEFAULT_USER_ID: &str = "roci_search_user";

/// Environment variables holding the Gemini key, in lookup order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Resolved settings for one assistant process.
#[derive(Clone, PartialEq)]
pub struct SearchConfig {
    api_key: Option<String>,
    model: String,
    app_name: String,
    user_id: String,
    base_url: Option<String>,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("model", &self.model)
            .field("app_name", &self.app_name)
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk shape of `~/.roci/search.toml`. Credentials are env-only.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub app_name: Option<String>,
    pub user_id: Option<String>,
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read a config file; a missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}

impl SearchConfig {
    /// Built-in defaults, no credential.
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            base_url: None,
        }
    }

    /// Defaults, then `~/.roci/search.toml`, then the process environment
    /// (including `.env`).
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.apply_file(FileConfig::load(&default_config_path())?);
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(app_name) = file.app_name {
            self.app_name = app_name;
        }
        if let Some(user_id) = file.user_id {
            self.user_id = user_id;
        }
        if file.base_url.is_some() {
            self.base_url = file.base_url;
        }
    }

    /// Overlay values from an environment lookup; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_ENV_VARS.iter().find_map(|var| get(*var)) {
            self.api_key = Some(key);
        }
        if let Some(model) = get("ROCI_SEARCH_MODEL") {
            self.model = model;
        }
        if let Some(app_name) = get("ROCI_SEARCH_APP_NAME") {
            self.app_name = app_name;
        }
        if let Some(user_id) = get("ROCI_SEARCH_USER_ID") {
            self.user_id = user_id;
        }
        if let Some(url) = get("GOOGLE_BASE_URL") {
            self.base_url = Some(url);
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The Gemini key, or `MissingCredential` naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key()
            .ok_or_else(|| SearchError::MissingCredential(API_KEY_ENV_VARS[0].to_string()))
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// `~/.roci/search.toml`, next to the other roci state.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".roci"))
        .unwrap_or_else(|| PathBuf::from(".roci"))
        .join("search.toml")
}
