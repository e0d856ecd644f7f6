//! Provider service: resolution reads and invalidating writes.
//!
//! [`ProviderService`] is what request handlers talk to. Reads go through
//! the [`ResolutionCache`]; every write goes to the [`ProviderStore`] first
//! and, only once the store reports success, evicts the affected
//! provider's cached resolutions.
//!
//! | Mutation | Invalidation scope |
//! |---|---|
//! | [`update_api_key`](ProviderService::update_api_key) | that provider |
//! | [`replace_models`](ProviderService::replace_models) | that provider |
//! | [`upsert_provider`](ProviderService::upsert_provider) | that provider, plus its old name on rename |
//! | [`delete_provider`](ProviderService::delete_provider) | that provider |
//!
//! A failed write returns its error and leaves the cache untouched.

mod builder;

pub use builder::{Mimir, MimirBuilder};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::cache::ResolutionCache;
use crate::store::ProviderStore;
use crate::types::{ModelCategory, ModelConfig, Provider, Resolution, ResolvedModel};
use crate::{MimirError, Result};

/// Store + cache pair with write-then-invalidate mutations.
pub struct ProviderService {
    store: Arc<dyn ProviderStore>,
    cache: Arc<ResolutionCache>,
}

impl ProviderService {
    pub(crate) fn new(store: Arc<dyn ProviderStore>, cache: Arc<ResolutionCache>) -> Self {
        Self { store, cache }
    }

    /// The underlying resolution cache.
    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// The underlying provider store.
    pub fn store(&self) -> &Arc<dyn ProviderStore> {
        &self.store
    }

    // ===== Reads =====

    /// Resolve a model selection through the cache.
    pub async fn resolve(
        &self,
        provider: &str,
        model: &str,
        category: ModelCategory,
    ) -> Result<Resolution> {
        self.cache.resolve(provider, model, category).await
    }

    /// Resolve a selection that must be usable.
    ///
    /// `NotFound` becomes [`MimirError::ModelNotConfigured`], whose message
    /// tells the user what to fix in their provider settings.
    pub async fn resolve_required(
        &self,
        provider: &str,
        model: &str,
        category: ModelCategory,
    ) -> Result<Arc<ResolvedModel>> {
        self.resolve(provider, model, category)
            .await?
            .into_result(provider, model)
    }

    /// All providers, straight from the store.
    pub async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.store.list().await
    }

    /// Every enabled model of `category` on a provider with an API key.
    ///
    /// Reads the store directly; used to populate model pickers.
    pub async fn available_models(&self, category: ModelCategory) -> Result<Vec<ResolvedModel>> {
        let providers = self.store.list().await?;
        Ok(providers
            .into_iter()
            .filter(Provider::has_api_key)
            .flat_map(|provider| {
                provider
                    .models
                    .iter()
                    .filter(|m| m.is_usable_for(category))
                    .map(|model| ResolvedModel {
                        provider: provider.clone(),
                        model: model.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    // ===== Writes =====

    /// Set or clear a provider's API key.
    #[instrument(skip(self, api_key), fields(clearing = api_key.is_none()))]
    pub async fn update_api_key(&self, name: &str, api_key: Option<String>) -> Result<Provider> {
        let updated = self
            .store
            .update_api_key(name, api_key)
            .await
            .inspect_err(|e| warn!(provider = name, error = %e, "API key update failed"))?;
        self.cache.invalidate(Some(name)).await;
        Ok(updated)
    }

    /// Replace a provider's model list.
    #[instrument(skip(self, models), fields(models = models.len()))]
    pub async fn replace_models(&self, name: &str, models: Vec<ModelConfig>) -> Result<Provider> {
        validate_models(name, &models)?;
        let updated = self
            .store
            .replace_models(name, models)
            .await
            .inspect_err(|e| warn!(provider = name, error = %e, "model list update failed"))?;
        self.cache.invalidate(Some(name)).await;
        Ok(updated)
    }

    /// Create or update a provider.
    ///
    /// Returns the previous record, if any. On rename, both the old and the
    /// new name are invalidated.
    #[instrument(skip(self, provider), fields(provider = %provider.name))]
    pub async fn upsert_provider(&self, provider: Provider) -> Result<Option<Provider>> {
        validate_provider(&provider)?;
        let name = provider.name.clone();
        let previous = self
            .store
            .upsert(provider)
            .await
            .inspect_err(|e| warn!(provider = %name, error = %e, "provider save failed"))?;
        self.cache.invalidate(Some(&name)).await;
        if let Some(old) = previous.as_ref().filter(|p| p.name != name) {
            self.cache.invalidate(Some(&old.name)).await;
        }
        Ok(previous)
    }

    /// Delete a provider. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn delete_provider(&self, name: &str) -> Result<bool> {
        let removed = self
            .store
            .delete(name)
            .await
            .inspect_err(|e| warn!(provider = name, error = %e, "provider delete failed"))?;
        self.cache.invalidate(Some(name)).await;
        Ok(removed)
    }

    /// Drop every cached resolution, e.g. after a bulk import that bypassed
    /// this service.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate(None).await;
    }
}

fn validate_provider(provider: &Provider) -> Result<()> {
    if provider.name.trim().is_empty() {
        return Err(MimirError::InvalidInput(
            "provider name must be non-empty".to_string(),
        ));
    }
    if provider.name.contains(':') {
        return Err(MimirError::InvalidInput(format!(
            "provider name must not contain ':': {}",
            provider.name
        )));
    }
    if provider.base_url.trim().is_empty() {
        return Err(MimirError::InvalidInput(format!(
            "provider {} has an empty base URL",
            provider.name
        )));
    }
    validate_models(&provider.name, &provider.models)
}

fn validate_models(provider: &str, models: &[ModelConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for model in models {
        if model.id.trim().is_empty() {
            return Err(MimirError::InvalidInput(format!(
                "provider {provider} has a model with an empty id"
            )));
        }
        if !seen.insert(model.id.as_str()) {
            return Err(MimirError::InvalidInput(format!(
                "provider {provider} lists model {} more than once",
                model.id
            )));
        }
    }
    Ok(())
}
