//! Configuration for the layer store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the layer store and its decoded-value cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory for decoded-value cache files. Empty selects an
    /// OS-appropriate per-user cache path.
    pub cache_directory: PathBuf,

    /// Cache files older than this many days are removed by the sweep.
    pub cache_max_age_days: u32,

    /// Total cache size the sweep trims down to, in bytes.
    pub cache_max_bytes: u64,

    /// Seconds a decoded layer stays resident after its last access.
    pub layer_idle_expiry_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_directory: PathBuf::new(),
            cache_max_age_days: 14,
            cache_max_bytes: 1024 * 1024 * 1024,
            layer_idle_expiry_seconds: 60,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRIB_CACHE_DIR") {
            if !val.is_empty() {
                config.cache_directory = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("GRIB_CACHE_MAX_AGE_DAYS") {
            if let Ok(days) = val.parse() {
                config.cache_max_age_days = days;
            }
        }

        if let Ok(val) = std::env::var("GRIB_CACHE_MAX_BYTES") {
            if let Ok(bytes) = val.parse() {
                config.cache_max_bytes = bytes;
            }
        }

        if let Ok(val) = std::env::var("GRIB_LAYER_IDLE_EXPIRY_SECONDS") {
            if let Ok(secs) = val.parse() {
                config.layer_idle_expiry_seconds = secs;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_max_bytes == 0 {
            return Err("cache_max_bytes must be > 0".to_string());
        }
        if self.layer_idle_expiry_seconds == 0 {
            return Err("layer_idle_expiry_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// The cache directory to use, resolving the empty default to a
    /// per-user cache location.
    pub fn resolved_cache_directory(&self) -> PathBuf {
        if !self.cache_directory.as_os_str().is_empty() {
            return self.cache_directory.clone();
        }
        directories::ProjectDirs::from("", "", "route-weather")
            .map(|dirs| dirs.cache_dir().join("layers"))
            .unwrap_or_else(|| std::env::temp_dir().join("route-weather-layers"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.cache_max_age_days, 14);
        assert_eq!(config.cache_max_bytes, 1024 * 1024 * 1024);
        assert_eq!(config.layer_idle_expiry_seconds, 60);
        assert!(config.cache_directory.as_os_str().is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StoreConfig::default();
        assert!(config.validate().is_ok());

        config.cache_max_bytes = 0;
        assert!(config.validate().is_err());

        config = StoreConfig::default();
        config.layer_idle_expiry_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_cache_directory_nonempty() {
        let config = StoreConfig::default();
        assert!(!config.resolved_cache_directory().as_os_str().is_empty());

        let explicit = StoreConfig {
            cache_directory: PathBuf::from("/tmp/somewhere"),
            ..StoreConfig::default()
        };
        assert_eq!(
            explicit.resolved_cache_directory(),
            PathBuf::from("/tmp/somewhere")
        );
    }
}
