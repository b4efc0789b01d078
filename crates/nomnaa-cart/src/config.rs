//! # Shop Configuration
//!
//! Settings for the cart binaries, read once at startup.
//!
//! ## Environment Variables
//! - `NOMNAA_DB_PATH`: SQLite file (default `./nomnaa_dev.db`)
//! - `NOMNAA_DB_MAX_CONNECTIONS`: pool size (default 5)
//! - `NOMNAA_LOG_FILTER`: tracing filter when `RUST_LOG` is unset
//!
//! Configuration is read-only after loading.

use std::path::PathBuf;

use thiserror::Error;

use nomnaa_db::DbConfig;

pub const ENV_DB_PATH: &str = "NOMNAA_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "NOMNAA_DB_MAX_CONNECTIONS";
pub const ENV_LOG_FILTER: &str = "NOMNAA_LOG_FILTER";

pub const DEFAULT_DB_PATH: &str = "./nomnaa_dev.db";
pub const DEFAULT_LOG_FILTER: &str = "info,nomnaa=debug,sqlx=warn";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the cart binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub db_path: PathBuf,
    pub db_max_connections: u32,
    pub log_filter: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            db_max_connections: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ShopConfig {
    /// Loads configuration from `NOMNAA_*` environment variables over defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ShopConfig::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_DB_MAX_CONNECTIONS) {
            let max = raw
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: ENV_DB_MAX_CONNECTIONS,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            if max == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_DB_MAX_CONNECTIONS,
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.db_max_connections = max;
        }

        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone()).max_connections(self.db_max_connections)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ShopConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_overrides() {
        let config = ShopConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/nomnaa/cart.db"),
            (ENV_DB_MAX_CONNECTIONS, "12"),
            (ENV_LOG_FILTER, "warn"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/nomnaa/cart.db"));
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_invalid_max_connections() {
        let err = ShopConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_DB_MAX_CONNECTIONS));

        assert!(ShopConfig::from_lookup(lookup_from(&[(ENV_DB_MAX_CONNECTIONS, "0")])).is_err());
    }
}
