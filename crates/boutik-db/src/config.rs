//! # Startup Configuration
//!
//! Application configuration loaded from environment variables and
//! validated before anything touches the database.
//!
//! ## Modes
//! - `Development` (default): missing values fall back to a local
//!   SQLite file and a development secret, each with a warning.
//! - `Production` (`BOUTIK_ENV=production`): missing or empty
//!   `DATABASE_URL` / `SECRET_KEY` fail startup. No silent defaults.

use thiserror::Error;
use tracing::warn;

/// Fallback database for local development.
const DEV_DATABASE_URL: &str = "sqlite://boutik.db";

/// Fallback secret for local development. Never used in production
/// mode: startup fails instead.
const DEV_SECRET_KEY: &str = "boutik-dev-secret-change-in-production";

// =============================================================================
// Run Mode
// =============================================================================

/// Deployment mode, selected by `BOUTIK_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    fn parse(value: Option<&str>) -> RunMode {
        match value {
            Some(v) if v.eq_ignore_ascii_case("production") => RunMode::Production,
            _ => RunMode::Development,
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (`sqlite://...`).
    pub database_url: String,

    /// Secret key for session signing in the presentation layer.
    pub secret_key: String,

    /// Deployment mode.
    pub mode: RunMode,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an injected lookup.
    ///
    /// Keeps tests off the process environment; `from_env` is the thin
    /// production wrapper.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = RunMode::parse(lookup("BOUTIK_ENV").as_deref());

        let database_url = match non_empty(lookup("DATABASE_URL")) {
            Some(url) => url,
            None if mode == RunMode::Production => {
                return Err(ConfigError::MissingRequired("DATABASE_URL"));
            }
            None => {
                warn!("DATABASE_URL not set, using local SQLite for development");
                DEV_DATABASE_URL.to_string()
            }
        };

        let secret_key = match non_empty(lookup("SECRET_KEY")) {
            Some(key) => key,
            None if mode == RunMode::Production => {
                return Err(ConfigError::MissingRequired("SECRET_KEY"));
            }
            None => {
                warn!("SECRET_KEY not set, using development secret");
                DEV_SECRET_KEY.to_string()
            }
        };

        Ok(AppConfig {
            database_url,
            secret_key,
            mode,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(&'static str),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars = env(pairs);
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_development_falls_back_with_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.mode, RunMode::Development);
        assert_eq!(config.database_url, DEV_DATABASE_URL);
        assert_eq!(config.secret_key, DEV_SECRET_KEY);
    }

    #[test]
    fn test_production_requires_database_url() {
        let err = load(&[("BOUTIK_ENV", "production"), ("SECRET_KEY", "s3cret")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired("DATABASE_URL")));
    }

    #[test]
    fn test_production_requires_secret_key() {
        let err = load(&[
            ("BOUTIK_ENV", "production"),
            ("DATABASE_URL", "sqlite:///srv/boutik.db"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired("SECRET_KEY")));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = load(&[
            ("BOUTIK_ENV", "production"),
            ("DATABASE_URL", "   "),
            ("SECRET_KEY", "s3cret"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired("DATABASE_URL")));
    }

    #[test]
    fn test_production_with_full_config() {
        let config = load(&[
            ("BOUTIK_ENV", "PRODUCTION"),
            ("DATABASE_URL", "sqlite:///srv/boutik.db"),
            ("SECRET_KEY", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.mode, RunMode::Production);
        assert_eq!(config.database_url, "sqlite:///srv/boutik.db");
    }
}
