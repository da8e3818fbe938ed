//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BANDA_CART_KEY` - Storage key holding the cart record (default: `banda4erep_cart_v1`)
//! - `BANDA_STORAGE_PATH` - File backing the key-value store for the CLI
//!   (default: `.banda/local_storage.json`)
//! - `BANDA_STORAGE_QUOTA_BYTES` - Maximum total bytes of all keys and values the store holds
//! - `BANDA_WATCH_INTERVAL_MS` - Poll interval for `watch` (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Storage key the storefront has always used for its cart record.
pub const DEFAULT_CART_KEY: &str = "banda4erep_cart_v1";

const DEFAULT_STORAGE_PATH: &str = ".banda/local_storage.json";
const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Key of the cart record in the key-value store
    pub cart_key: String,
    /// Path of the file-backed store
    pub storage_path: PathBuf,
    /// Optional byte quota on the whole store
    pub storage_quota_bytes: Option<usize>,
    /// How often `watch` polls for changes made elsewhere
    pub watch_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            storage_quota_bytes: None,
            watch_interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cart_key = lookup("BANDA_CART_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        let storage_path = lookup("BANDA_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);
        let storage_quota_bytes = parse_optional(&lookup, "BANDA_STORAGE_QUOTA_BYTES")?;
        let watch_interval_ms = parse_optional(&lookup, "BANDA_WATCH_INTERVAL_MS")?
            .unwrap_or(DEFAULT_WATCH_INTERVAL_MS);
        if watch_interval_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BANDA_WATCH_INTERVAL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            cart_key,
            storage_path,
            storage_quota_bytes,
            watch_interval: Duration::from_millis(watch_interval_ms),
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional environment variable.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}
