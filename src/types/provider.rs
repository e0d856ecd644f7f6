//! Provider records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelConfig;

/// A configured upstream model vendor: connection details, API key and
/// the models it offers.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Stable identifier. Stores fill it from `name` when left empty.
    #[serde(default)]
    pub id: String,
    /// Unique provider name (e.g. "openai"); part of every cache key.
    pub name: String,
    /// Human-facing display name.
    #[serde(default)]
    pub alias: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Offered models, in display order.
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// Create a provider with no API key and no models.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            alias: None,
            base_url: base_url.into(),
            api_key: None,
            models: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Append a model to the provider's list.
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.models.push(model);
        self
    }

    /// Whether a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Look up a model by id, regardless of category or enabled state.
    pub fn model(&self, id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Display name: the alias if set, otherwise the name.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// API keys stay out of logs.
impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("models", &self.models)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
