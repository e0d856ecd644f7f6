//! Configuration loading for the `mimir` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.mimir/secrets.toml` (user, must be 0600)
//! 2. `/etc/mimir/secrets.toml` (system, must be 0600)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::{CacheConfig, CacheSection};
use crate::store::InMemoryProviderStore;
use crate::types::Provider;
use crate::{MimirError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
    /// Providers to seed the in-memory store with.
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// Secrets configuration (API keys), one table per provider name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(flatten)]
    pub providers: HashMap<String, ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.mimir/config.toml`
    /// 3. `/etc/mimir/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from_file(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(MimirError::Configuration(
            "No config file found. Create ~/.mimir/config.toml or /etc/mimir/config.toml"
                .to_string(),
        ))
    }

    /// Resolution cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        self.cache.clone().into()
    }

    /// Build an in-memory store from the configured providers.
    ///
    /// Providers without an inline `api_key` take theirs from `secrets`.
    pub fn build_store(&self, secrets: &Secrets) -> Result<InMemoryProviderStore> {
        let providers = self.providers.iter().cloned().map(|mut provider| {
            if provider.api_key.is_none() {
                provider.api_key = secrets.api_key(&provider.name);
            }
            provider
        });
        InMemoryProviderStore::with_providers(providers)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.mimir/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/mimir/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".mimir").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/mimir/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load secrets from a specific file, without permission checks.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    pub fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(MimirError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for a provider, falling back to `<NAME>_API_KEY`.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(env_var_name(provider)).ok())
    }
}

/// Environment variable consulted for a provider's key: `open-ai` → `OPEN_AI_API_KEY`.
fn env_var_name(provider: &str) -> String {
    let stem: String = provider
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_API_KEY")
}
