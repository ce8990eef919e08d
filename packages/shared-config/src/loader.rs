//! Batch loader tuning

use std::time::Duration;

use crate::{parse_env, ConfigError, ConfigResult};

/// Tuning knobs for the request-scoped batch loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// How long a batch stays open for more keys, in milliseconds.
    /// Zero dispatches once a scheduler pass adds no more keys.
    pub batch_delay_ms: u64,

    /// Upper bound on keys per bulk fetch; a full batch dispatches immediately
    pub max_batch_size: usize,
}

impl LoaderConfig {
    /// Load loader configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            batch_delay_ms: parse_env("LOADER_BATCH_DELAY_MS", 1)?,
            max_batch_size: parse_env("LOADER_MAX_BATCH_SIZE", 1000)?,
        };

        if config.max_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "LOADER_MAX_BATCH_SIZE must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Batch window as a duration
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_delay_ms: 1,
            max_batch_size: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.batch_delay(), Duration::from_millis(1));
        assert_eq!(config.max_batch_size, 1000);
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("LOADER_BATCH_DELAY_MS", Some("0")),
                ("LOADER_MAX_BATCH_SIZE", Some("25")),
            ],
            || {
                let config = LoaderConfig::from_env().unwrap();
                assert_eq!(config.batch_delay(), Duration::ZERO);
                assert_eq!(config.max_batch_size, 25);
            },
        );
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        temp_env::with_var("LOADER_MAX_BATCH_SIZE", Some("0"), || {
            assert!(matches!(
                LoaderConfig::from_env(),
                Err(ConfigError::ValidationError(_))
            ));
        });
    }
}
