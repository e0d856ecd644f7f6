//! Mimir - provider/model resolution cache
//!
//! Resolves a user's model selection (provider name + model id + usage
//! category) into a usable configuration: the provider's connection
//! details and API key plus the model's capability record. Resolutions,
//! including "not found" outcomes, are cached for 24 hours; every provider
//! mutation made through [`ProviderService`] invalidates the affected
//! entries after the store write succeeds.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mimir::{InMemoryProviderStore, Mimir, ModelCategory, ModelConfig, Provider};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> mimir::Result<()> {
//! let store = InMemoryProviderStore::with_providers([
//!     Provider::new("openai", "https://api.openai.com/v1")
//!         .with_api_key("sk-your-key")
//!         .with_model(ModelConfig::new("gpt-4o", ModelCategory::Chat)),
//! ])?;
//! let service = Mimir::builder().store(Arc::new(store)).build()?;
//!
//! let resolved = service
//!     .resolve_required("openai", "gpt-4o", ModelCategory::Chat)
//!     .await?;
//! println!("{} via {}", resolved.model.id, resolved.provider.base_url);
//!
//! // Clearing the key invalidates the cached resolution.
//! service.update_api_key("openai", None).await?;
//! let resolution = service.resolve("openai", "gpt-4o", ModelCategory::Chat).await?;
//! assert!(!resolution.is_found());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, ResolutionCache, ResolutionKey};
pub use error::{MimirError, Result};
pub use service::{Mimir, MimirBuilder, ProviderService};
pub use store::{InMemoryProviderStore, ProviderStore};
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{ModelCategory, ModelConfig, NotFoundReason, Provider, Resolution, ResolvedModel};
