//! Resolution outcomes.
//!
//! Turning `(provider name, model id, category)` into either a usable
//! configuration or a reason why none exists.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ModelCategory, ModelConfig, Provider};
use crate::{MimirError, Result};

/// Why a resolution produced no usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum NotFoundReason {
    /// No provider with that name exists.
    ProviderNotFound,
    /// The provider does not list the model.
    ModelNotFound,
    /// The model exists but is offered for a different category.
    CategoryMismatch {
        expected: ModelCategory,
        actual: ModelCategory,
    },
    /// The model exists but is disabled.
    ModelDisabled,
    /// The provider has no API key configured.
    MissingApiKey,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::ProviderNotFound => f.write_str("provider is not configured"),
            NotFoundReason::ModelNotFound => f.write_str("model is not offered by the provider"),
            NotFoundReason::CategoryMismatch { expected, actual } => {
                write!(f, "model is a {actual} model, expected {expected}")
            }
            NotFoundReason::ModelDisabled => f.write_str("model is disabled"),
            NotFoundReason::MissingApiKey => f.write_str("provider has no API key"),
        }
    }
}

/// A provider snapshot paired with the model selected from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    pub provider: Provider,
    pub model: ModelConfig,
}

/// Outcome of resolving a model selection.
///
/// Negative outcomes are values, cached exactly like positive ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Arc<ResolvedModel>),
    NotFound(NotFoundReason),
}

impl Resolution {
    /// Select `model_id` for `category` from a store snapshot.
    ///
    /// The first model matching id, category and enabled state wins. When
    /// none does, the reason is taken from the first model with that id.
    pub fn evaluate(provider: Option<Provider>, model_id: &str, category: ModelCategory) -> Self {
        let Some(provider) = provider else {
            return Resolution::NotFound(NotFoundReason::ProviderNotFound);
        };

        let usable = provider
            .models
            .iter()
            .find(|m| m.id == model_id && m.is_usable_for(category));

        let Some(model) = usable else {
            let reason = match provider.model(model_id) {
                None => NotFoundReason::ModelNotFound,
                Some(m) if m.category != category => NotFoundReason::CategoryMismatch {
                    expected: category,
                    actual: m.category,
                },
                Some(_) => NotFoundReason::ModelDisabled,
            };
            return Resolution::NotFound(reason);
        };

        if !provider.has_api_key() {
            return Resolution::NotFound(NotFoundReason::MissingApiKey);
        }

        let model = model.clone();
        Resolution::Found(Arc::new(ResolvedModel { provider, model }))
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// The resolved configuration, if any.
    pub fn found(&self) -> Option<&ResolvedModel> {
        match self {
            Resolution::Found(resolved) => Some(resolved),
            Resolution::NotFound(_) => None,
        }
    }

    /// The not-found reason, if any.
    pub fn reason(&self) -> Option<&NotFoundReason> {
        match self {
            Resolution::Found(_) => None,
            Resolution::NotFound(reason) => Some(reason),
        }
    }

    /// Label used for the `outcome` metric label.
    pub(crate) fn outcome(&self) -> &'static str {
        if self.is_found() { "found" } else { "not_found" }
    }

    /// Require a usable configuration, mapping `NotFound` into
    /// [`MimirError::ModelNotConfigured`].
    pub fn into_result(self, provider: &str, model: &str) -> Result<Arc<ResolvedModel>> {
        match self {
            Resolution::Found(resolved) => Ok(resolved),
            Resolution::NotFound(reason) => Err(MimirError::ModelNotConfigured {
                provider: provider.to_string(),
                model: model.to_string(),
                reason,
            }),
        }
    }
}
