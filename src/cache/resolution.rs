//! Model resolution cache.
//!
//! [`ResolutionCache`] answers "which provider connection and model record
//! should serve this selection?" without querying the
//! [`ProviderStore`] on every request.
//!
//! # Architecture
//!
//! - Moka-backed LRU + TTL cache keyed on [`ResolutionKey`]
//!   (provider name, model id, category). Expired entries are never served;
//!   moka checks age on every read, no sweeper task is involved.
//! - Negative outcomes ([`Resolution::NotFound`]) are cached with the same
//!   TTL as positive ones, so permanently missing configurations do not
//!   hammer the store.
//! - Store failures are propagated and never cached.
//!
//! # Invalidation races
//!
//! Every invalidation bumps an epoch counter before evicting. A resolve
//! that sees the epoch move while its store query was in flight still
//! returns the fresh result, but drops the entry it wrote, so a concurrent
//! mutation cannot be shadowed by a pre-write snapshot. Two concurrent
//! misses for the same key may both query the store; the second write
//! overwrites the first with an equivalent value.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use tracing::{debug, info, instrument, warn};

use super::{CacheConfig, MAX_TTL};
use crate::store::ProviderStore;
use crate::telemetry;
use crate::types::{ModelCategory, Resolution};
use crate::{MimirError, Result};

/// Cache key for one model selection.
///
/// Displays as `provider:model`; the category is part of equality so one
/// cache serves chat, vision, audio and agent lookups side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub provider: String,
    pub model: String,
    pub category: ModelCategory,
}

impl ResolutionKey {
    pub fn new(provider: &str, model: &str, category: ModelCategory) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            category,
        }
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// In-memory cache of model resolutions.
///
/// Thread-safe (moka handles concurrent access internally). Create once at
/// start-up and share behind an `Arc`; entries are never persisted.
pub struct ResolutionCache {
    store: Arc<dyn ProviderStore>,
    cache: Cache<ResolutionKey, Resolution>,
    epoch: AtomicU64,
    config: CacheConfig,
}

impl ResolutionCache {
    /// Create an empty cache reading through `store`.
    ///
    /// The TTL is capped at [`MAX_TTL`]; use [`CacheConfig::validate`] (as
    /// the builder does) to reject such configs instead.
    pub fn new(store: Arc<dyn ProviderStore>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl.min(MAX_TTL))
            .build();
        Self {
            store,
            cache,
            epoch: AtomicU64::new(0),
            config: config.clone(),
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Resolve a model selection, consulting the store only on a miss.
    ///
    /// Returns `Ok(Resolution::NotFound(_))` when the provider is absent,
    /// the model is absent, disabled or of another category, or the
    /// provider has no API key. Returns `Err` only for empty input or a
    /// failed store query; neither is cached.
    #[instrument(skip(self), level = "debug")]
    pub async fn resolve(
        &self,
        provider: &str,
        model: &str,
        category: ModelCategory,
    ) -> Result<Resolution> {
        if provider.is_empty() || model.is_empty() {
            return Err(MimirError::InvalidInput(
                "provider name and model id must be non-empty".to_string(),
            ));
        }

        let key = ResolutionKey::new(provider, model, category);
        if let Some(hit) = self.cache.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(key = %key, outcome = hit.outcome(), "resolution cache hit");
            return Ok(record_outcome(hit));
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        let epoch = self.epoch.load(Ordering::Acquire);
        let snapshot = match self.store.find_by_name(provider).await {
            Ok(snapshot) => {
                metrics::counter!(telemetry::STORE_QUERIES_TOTAL, "status" => "ok").increment(1);
                snapshot
            }
            Err(e) => {
                metrics::counter!(telemetry::STORE_QUERIES_TOTAL, "status" => "error")
                    .increment(1);
                warn!(key = %key, error = %e, "provider store query failed");
                return Err(e);
            }
        };

        let resolution = Resolution::evaluate(snapshot, model, category);
        debug!(key = %key, outcome = resolution.outcome(), "resolution cache miss");

        self.cache.insert(key.clone(), resolution.clone()).await;
        if self.epoch.load(Ordering::Acquire) != epoch {
            // An invalidation overlapped the store query.
            self.cache.invalidate(&key).await;
        }

        Ok(record_outcome(resolution))
    }

    /// Peek at a live entry without querying the store.
    pub async fn get_cached(
        &self,
        provider: &str,
        model: &str,
        category: ModelCategory,
    ) -> Option<Resolution> {
        self.cache
            .get(&ResolutionKey::new(provider, model, category))
            .await
    }

    /// Evict cached resolutions.
    ///
    /// `Some(name)` evicts only that provider's entries; `None` evicts
    /// everything. Idempotent and infallible.
    pub async fn invalidate(&self, provider: Option<&str>) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        match provider {
            Some(name) => {
                let keys: Vec<Arc<ResolutionKey>> = self
                    .cache
                    .iter()
                    .filter(|(k, _)| k.provider == name)
                    .map(|(k, _)| k)
                    .collect();
                for key in &keys {
                    self.cache.invalidate(key.as_ref()).await;
                }
                metrics::counter!(telemetry::INVALIDATIONS_TOTAL, "scope" => "provider")
                    .increment(1);
                info!(provider = name, evicted = keys.len(), "invalidated provider resolutions");
            }
            None => {
                self.cache.invalidate_all();
                metrics::counter!(telemetry::INVALIDATIONS_TOTAL, "scope" => "all").increment(1);
                info!("invalidated all resolutions");
            }
        }
    }

    /// Approximate number of live entries.
    ///
    /// Moka updates this lazily; call after [`sync`](Self::sync) for an
    /// exact figure.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Flush moka's pending maintenance (evictions, counters).
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

fn record_outcome(resolution: Resolution) -> Resolution {
    metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "outcome" => resolution.outcome())
        .increment(1);
    resolution
}
