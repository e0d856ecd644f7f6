//! Provider store abstraction.
//!
//! The store owns provider records (and the models embedded in them). The
//! resolution cache only reads through [`ProviderStore::find_by_name`];
//! write operations are driven by [`ProviderService`](crate::ProviderService),
//! which invalidates the cache after each successful write.
//!
//! # Failure semantics
//!
//! Implementations return `Ok(None)` / `Ok(false)` for legitimately absent
//! records and `Err(MimirError::Store)` for infrastructure failures
//! (connectivity, malformed rows). The cache relies on this split: absent
//! records are cached as negative results, failures are never cached.

mod memory;

pub use memory::InMemoryProviderStore;

use async_trait::async_trait;

use crate::Result;
use crate::types::{ModelConfig, Provider};

/// Persistent home of provider records.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Find a provider by its unique name, with its full current model list
    /// and API key.
    async fn find_by_name(&self, name: &str) -> Result<Option<Provider>>;

    /// All providers, ordered by name.
    async fn list(&self) -> Result<Vec<Provider>>;

    /// Create or update a provider, matched by id.
    ///
    /// Returns the previous record when one was replaced, so callers can
    /// detect renames.
    async fn upsert(&self, provider: Provider) -> Result<Option<Provider>>;

    /// Delete a provider by name. Returns whether a record was removed.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Set or clear a provider's API key.
    ///
    /// Returns [`MimirError::ProviderNotFound`](crate::MimirError::ProviderNotFound)
    /// when no such provider exists.
    async fn update_api_key(&self, name: &str, api_key: Option<String>) -> Result<Provider>;

    /// Replace a provider's model list.
    ///
    /// Returns [`MimirError::ProviderNotFound`](crate::MimirError::ProviderNotFound)
    /// when no such provider exists.
    async fn replace_models(&self, name: &str, models: Vec<ModelConfig>) -> Result<Provider>;
}
