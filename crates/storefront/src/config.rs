//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults reproduce the demo setup.
//!
//! - `DHEEKART_CATALOG_URL` - Product feed endpoint
//!   (default: `https://dummyjson.com/products?limit=100`)
//! - `DHEEKART_DATA_FILE` - Path of the persistent store file
//!   (default: `dheekart-store.json`)
//! - `DHEEKART_REDIRECT_DELAY_MS` - Delay before the post-checkout redirect
//!   back to the catalog (default: 3000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default product feed endpoint (dummyjson layout).
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";

/// Default persistent store file.
pub const DEFAULT_DATA_FILE: &str = "dheekart-store.json";

/// Default post-checkout redirect delay in milliseconds.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product feed endpoint.
    pub catalog_url: Url,
    /// Path of the persistent store file.
    pub data_file: PathBuf,
    /// Delay before the post-checkout redirect fires.
    pub redirect_delay: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = get_env_or_default("DHEEKART_CATALOG_URL", DEFAULT_CATALOG_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DHEEKART_CATALOG_URL".to_string(), e.to_string())
            })?;

        let data_file = PathBuf::from(get_env_or_default("DHEEKART_DATA_FILE", DEFAULT_DATA_FILE));

        let redirect_delay_ms = get_env_or_default(
            "DHEEKART_REDIRECT_DELAY_MS",
            &DEFAULT_REDIRECT_DELAY_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("DHEEKART_REDIRECT_DELAY_MS".to_string(), e.to_string())
        })?;

        Ok(Self {
            catalog_url,
            data_file,
            redirect_delay: Duration::from_millis(redirect_delay_ms),
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let catalog_url = Url::parse(DEFAULT_CATALOG_URL).expect("default catalog URL is valid");
        Self {
            catalog_url,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.catalog_url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.redirect_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("DHEEKART_UNSET_TEST_VAR", "fallback"),
            "fallback"
        );
    }
}
