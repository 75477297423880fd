//! Configuration Module
//!
//! Construction options for a cache instance.

use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache construction options.
///
/// The default configuration is an unbounded cache whose entries never expire
/// and which runs no background sweep. All three knobs are optional and
/// independent.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Default TTL applied by `set` when no explicit TTL is given.
    /// None = entries never expire unless set with an explicit TTL.
    pub default_ttl: Option<Duration>,
    /// Maximum number of entries before LRU eviction kicks in.
    /// None = unbounded.
    pub max_entries: Option<usize>,
    /// Interval of the background expiry sweep. None = no background sweep;
    /// expired entries are still invisible to reads and can be reclaimed
    /// manually via `cleanup()`.
    pub cleanup_interval: Option<Duration>,
}

impl CacheConfig {
    /// Creates an empty configuration (unbounded, never-expiring, no sweep).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL used by `set`.
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Sets the background sweep interval.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval);
        self
    }

    /// Validates the configuration.
    ///
    /// Misconfiguration fails fast here rather than being silently clamped:
    /// a zero capacity could never hold an entry, a zero default TTL would
    /// expire every entry at insertion, and a zero sweep interval would spin.
    /// Disabling a knob is expressed by leaving it unset.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be at least 1; leave unset for an unbounded cache".to_string(),
            ));
        }
        if self.default_ttl == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be non-zero; leave unset for never-expiring entries".to_string(),
            ));
        }
        if self.cleanup_interval == Some(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval must be non-zero; leave unset to disable the sweep".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert!(config.default_ttl.is_none());
        assert!(config.max_entries.is_none());
        assert!(config.cleanup_interval.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::new()
            .default_ttl(Duration::from_secs(300))
            .max_entries(1000)
            .cleanup_interval(Duration::from_secs(1));

        assert_eq!(config.default_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.max_entries, Some(1000));
        assert_eq!(config.cleanup_interval, Some(Duration::from_secs(1)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let config = CacheConfig::new().max_entries(0);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_default_ttl() {
        let config = CacheConfig::new().default_ttl(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_cleanup_interval() {
        let config = CacheConfig::new().cleanup_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
