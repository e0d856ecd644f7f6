//! Builder for configuring provider services

use std::sync::Arc;

use super::ProviderService;
use crate::cache::{CacheConfig, ResolutionCache};
use crate::store::ProviderStore;
use crate::{MimirError, Result};

/// Main entry point for creating provider services.
pub struct Mimir;

impl Mimir {
    /// Create a new builder for configuring the service.
    pub fn builder() -> MimirBuilder {
        MimirBuilder::new()
    }
}

/// Builder for configuring provider services.
///
/// ```rust
/// # use std::sync::Arc;
/// # use mimir::{CacheConfig, InMemoryProviderStore, Mimir};
/// let service = Mimir::builder()
///     .store(Arc::new(InMemoryProviderStore::new()))
///     .cache(CacheConfig::default())
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct MimirBuilder {
    store: Option<Arc<dyn ProviderStore>>,
    cache_config: CacheConfig,
}

impl MimirBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider store (required).
    pub fn store(mut self, store: Arc<dyn ProviderStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Configure the resolution cache (default: 24h TTL, 1,000 entries).
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Build the service.
    ///
    /// Fails with a configuration error when no store was set, or when the
    /// cache config has a zero or over-long TTL or zero capacity.
    pub fn build(self) -> Result<ProviderService> {
        let store = self.store.ok_or_else(|| {
            MimirError::Configuration("no provider store configured".to_string())
        })?;
        self.cache_config.validate()?;

        let cache = Arc::new(ResolutionCache::new(Arc::clone(&store), &self.cache_config));
        Ok(ProviderService::new(store, cache))
    }
}
