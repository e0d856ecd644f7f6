//! Model configuration types.
//!
//! A [`ModelConfig`] is one model's capability record under a provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MimirError;

/// The usage category a model is offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    /// Multi-turn chat conversations.
    Chat,
    /// Image understanding.
    Vision,
    /// Speech-to-text and text-to-speech.
    Audio,
    /// Autonomous agent runs with tool use.
    Agent,
}

impl ModelCategory {
    /// All categories, in display order.
    pub const ALL: [ModelCategory; 4] = [
        ModelCategory::Chat,
        ModelCategory::Vision,
        ModelCategory::Audio,
        ModelCategory::Agent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Chat => "chat",
            ModelCategory::Vision => "vision",
            ModelCategory::Audio => "audio",
            ModelCategory::Agent => "agent",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelCategory {
    type Err = MimirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MimirError::InvalidInput(format!("unknown model category: {s:?}")))
    }
}

fn default_enabled() -> bool {
    true
}

/// Capability record for one model offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier, unique within its provider (e.g. "gpt-4o").
    pub id: String,
    /// Disabled models never resolve.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub category: ModelCategory,
    #[serde(default)]
    pub supports_function_calling: bool,
    #[serde(default)]
    pub supports_image_input: bool,
    /// Maximum context size in tokens (if known).
    #[serde(default)]
    pub context_limit: Option<usize>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl ModelConfig {
    /// Create an enabled model config with required fields.
    pub fn new(id: impl Into<String>, category: ModelCategory) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            category,
            supports_function_calling: false,
            supports_image_input: false,
            context_limit: None,
            description: None,
            temperature: None,
        }
    }

    /// Mark this model as disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_function_calling(mut self) -> Self {
        self.supports_function_calling = true;
        self
    }

    pub fn with_image_input(mut self) -> Self {
        self.supports_image_input = true;
        self
    }

    /// Set the context size limit.
    pub fn with_context_limit(mut self, tokens: usize) -> Self {
        self.context_limit = Some(tokens);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Whether this model can serve a request of the given category.
    pub fn is_usable_for(&self, category: ModelCategory) -> bool {
        self.enabled && self.category == category
    }
}
