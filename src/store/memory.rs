//! In-process provider store.
//!
//! Backs the CLI (seeded from the config file) and tests. Records live in a
//! `RwLock<BTreeMap>` keyed by provider id; name lookups scan, which is fine
//! for the handful of providers a deployment configures.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::ProviderStore;
use crate::types::{ModelConfig, Provider};
use crate::{MimirError, Result};

/// Provider store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryProviderStore {
    providers: RwLock<BTreeMap<String, Provider>>,
}

impl InMemoryProviderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `providers`.
    ///
    /// Fails on duplicate names, like [`ProviderStore::upsert`] would.
    pub fn with_providers(providers: impl IntoIterator<Item = Provider>) -> Result<Self> {
        let store = Self::new();
        {
            let mut map = store.write()?;
            for provider in providers {
                insert(&mut map, provider)?;
            }
        }
        Ok(store)
    }

    /// Create a store from a JSON array of providers.
    pub fn from_json(json: &str) -> Result<Self> {
        let providers: Vec<Provider> = serde_json::from_str(json)?;
        Self::with_providers(providers)
    }

    /// Number of providers stored.
    ///
    /// Still reports the real count after a writer panicked and poisoned the
    /// lock; every other operation fails with [`MimirError::Store`] instead.
    pub fn len(&self) -> usize {
        match self.providers.read() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Provider>>> {
        self.providers
            .read()
            .map_err(|e| MimirError::Store(format!("Failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Provider>>> {
        self.providers
            .write()
            .map_err(|e| MimirError::Store(format!("Failed to acquire write lock: {e}")))
    }

    fn modify<F>(&self, name: &str, f: F) -> Result<Provider>
    where
        F: FnOnce(&mut Provider),
    {
        let mut map = self.write()?;
        let provider = map
            .values_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| MimirError::ProviderNotFound(name.to_string()))?;
        f(provider);
        provider.updated_at = Utc::now();
        Ok(provider.clone())
    }
}

/// Insert or replace by id, rejecting a name already owned by another id.
fn insert(map: &mut BTreeMap<String, Provider>, mut provider: Provider) -> Result<Option<Provider>> {
    if provider.id.is_empty() {
        provider.id = provider.name.clone();
    }
    if map
        .values()
        .any(|p| p.name == provider.name && p.id != provider.id)
    {
        return Err(MimirError::InvalidInput(format!(
            "provider name already in use: {}",
            provider.name
        )));
    }
    Ok(map.insert(provider.id.clone(), provider))
}

#[async_trait]
impl ProviderStore for InMemoryProviderStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Provider>> {
        let map = self.read()?;
        Ok(map.values().find(|p| p.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Provider>> {
        let map = self.read()?;
        let mut providers: Vec<Provider> = map.values().cloned().collect();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(providers)
    }

    async fn upsert(&self, mut provider: Provider) -> Result<Option<Provider>> {
        provider.updated_at = Utc::now();
        let mut map = self.write()?;
        insert(&mut map, provider)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut map = self.write()?;
        let id = map
            .values()
            .find(|p| p.name == name)
            .map(|p| p.id.clone());
        Ok(id.is_some_and(|id| map.remove(&id).is_some()))
    }

    async fn update_api_key(&self, name: &str, api_key: Option<String>) -> Result<Provider> {
        self.modify(name, |p| p.api_key = api_key)
    }

    async fn replace_models(&self, name: &str, models: Vec<ModelConfig>) -> Result<Provider> {
        self.modify(name, |p| p.models = models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelCategory;

    fn openai() -> Provider {
        Provider::new("openai", "https://api.openai.com/v1")
            .with_api_key("sk-test")
            .with_model(ModelConfig::new("gpt-x", ModelCategory::Chat))
    }

    #[tokio::test]
    async fn len_survives_poisoned_lock() {
        let store = InMemoryProviderStore::with_providers([openai()]).unwrap();
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = store.providers.write().unwrap();
                    panic!("writer panicked while holding the lock");
                })
                .join();
        });
        assert!(store.providers.is_poisoned());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(matches!(store.find_by_name("openai").await, Err(MimirError::Store(_))));
    }

    #[tokio::test]
    async fn find_by_name_round_trip() {
        let store = InMemoryProviderStore::with_providers([openai()]).unwrap();
        let found = store.find_by_name("openai").await.unwrap().unwrap();
        assert_eq!(found.models.len(), 1);
        assert!(store.find_by_name("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_returns_previous_record() {
        let store = InMemoryProviderStore::new();
        assert!(store.upsert(openai()).await.unwrap().is_none());

        let renamed = Provider::new("openai-eu", "https://eu.api.openai.com/v1").with_id("openai");
        let previous = store.upsert(renamed).await.unwrap().unwrap();
        assert_eq!(previous.name, "openai");
        assert!(store.find_by_name("openai").await.unwrap().is_none());
        assert!(store.find_by_name("openai-eu").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let store = InMemoryProviderStore::with_providers([openai()]).unwrap();
        let clash = Provider::new("openai", "https://other").with_id("other-id");
        let err = store.upsert(clash).await.unwrap_err();
        assert!(matches!(err, MimirError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn update_api_key_on_missing_provider() {
        let store = InMemoryProviderStore::new();
        let err = store
            .update_api_key("ghost", Some("sk".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, MimirError::ProviderNotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn replace_models_and_delete() {
        let store = InMemoryProviderStore::with_providers([openai()]).unwrap();
        let updated = store
            .replace_models("openai", vec![ModelConfig::new("tts-1", ModelCategory::Audio)])
            .await
            .unwrap();
        assert_eq!(updated.models[0].id, "tts-1");

        assert!(store.delete("openai").await.unwrap());
        assert!(!store.delete("openai").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = InMemoryProviderStore::with_providers([
            Provider::new("zeta", "https://z"),
            Provider::new("alpha", "https://a"),
        ])
        .unwrap();
        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn from_json_fills_missing_ids() {
        let store = InMemoryProviderStore::from_json(
            r#"[{"name": "groq", "base_url": "https://api.groq.com",
                 "models": [{"id": "whisper-large", "category": "audio"}]}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
    }
}
