//! Caching subsystem.
//!
//! - [`ResolutionCache`] — resolves `(provider, model, category)` selections
//!   against the [`ProviderStore`](crate::store::ProviderStore), caching
//!   both usable configurations and not-found outcomes for a fixed TTL.
//!   Invalidated by [`ProviderService`](crate::ProviderService) after every
//!   provider write.

pub mod resolution;

pub use resolution::{ResolutionCache, ResolutionKey};

use std::time::Duration;

use serde::Deserialize;

use crate::{MimirError, Result};

/// Default time-to-live for resolutions: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);

/// Default maximum number of cached resolutions.
pub const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// Longest TTL moka accepts: 1,000 years of 365 days.
pub const MAX_TTL: Duration = Duration::from_secs(1_000 * 365 * 24 * 3600);

/// Configuration for the resolution cache.
///
/// ```rust
/// # use mimir::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(2_000)
///     .ttl(Duration::from_secs(12 * 3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum cached entries. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Reject settings that would disable caching or that moka refuses.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(MimirError::Configuration(
                "cache TTL must be greater than zero".to_string(),
            ));
        }
        if self.ttl > MAX_TTL {
            return Err(MimirError::Configuration(format!(
                "cache TTL of {}s exceeds the maximum of {}s",
                self.ttl.as_secs(),
                MAX_TTL.as_secs()
            )));
        }
        if self.max_entries == 0 {
            return Err(MimirError::Configuration(
                "cache max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[cache]` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// TTL in seconds (default: 86400).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum entries (default: 1000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl From<CacheSection> for CacheConfig {
    fn from(section: CacheSection) -> Self {
        CacheConfig::new()
            .max_entries(section.max_entries)
            .ttl(Duration::from_secs(section.ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 1_000);
        assert_eq!(config.ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn config_builder_pattern() {
        let config = CacheConfig::new()
            .max_entries(500)
            .ttl(Duration::from_secs(3600));
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn validate_accepts_defaults_and_bounds() {
        assert!(CacheConfig::default().validate().is_ok());
        assert!(CacheConfig::new().ttl(MAX_TTL).validate().is_ok());
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        assert!(CacheConfig::new().ttl(Duration::ZERO).validate().is_err());
        assert!(CacheConfig::new().max_entries(0).validate().is_err());

        let err = CacheConfig::new()
            .ttl(MAX_TTL + Duration::from_secs(1))
            .validate()
            .unwrap_err();
        assert!(matches!(err, MimirError::Configuration(_)));
    }

    #[test]
    fn section_converts_to_config() {
        let section = CacheSection {
            ttl_secs: 60,
            max_entries: 10,
        };
        let config: CacheConfig = section.into();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_entries, 10);
    }
}
