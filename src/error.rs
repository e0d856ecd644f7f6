//! Mimir error types

use crate::types::NotFoundReason;

/// Mimir error types
///
/// A [`Resolution::NotFound`](crate::Resolution::NotFound) is a normal
/// outcome, not an error. Only callers that require a usable model turn it
/// into [`MimirError::ModelNotConfigured`].
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Store errors
    /// The provider store query or write itself failed. Never cached.
    #[error("provider store error: {0}")]
    Store(String),

    /// A mutation targeted a provider that does not exist.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    // Resolution errors
    #[error("model '{model}' is not usable on provider '{provider}': {reason}")]
    ModelNotConfigured {
        provider: String,
        model: String,
        reason: NotFoundReason,
    },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MimirError {
    /// Whether this error came from the store rather than from the caller.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, MimirError::Store(_))
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
