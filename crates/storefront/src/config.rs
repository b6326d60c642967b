//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 4050)
//! - `STOREFRONT_DATA_DIR` - Directory holding the JSON documents (default: data)
//! - `STOREFRONT_CART_FILE` - Cart document file name (default: cart.json)
//! - `STOREFRONT_PRODUCTS_FILE` - Product catalog file name (default: products.json)
//! - `STOREFRONT_UPLOADS_DIR` - Uploaded product images, served at /uploads (default: uploads)
//! - `STOREFRONT_STATIC_DIR` - Public assets, served at /static (default: public)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// JSON document locations
    pub data: DataConfig,
    /// Directory served at `/uploads`
    pub uploads_dir: PathBuf,
    /// Directory served at `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Locations of the JSON documents.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory holding the documents
    pub dir: PathBuf,
    /// Cart document file name
    pub cart_file: String,
    /// Product catalog file name
    pub products_file: String,
}

impl DataConfig {
    /// Data config with the default file names under `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cart_file: "cart.json".to_string(),
            products_file: "products.json".to_string(),
        }
    }

    /// Full path of the cart document.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.dir.join(&self.cart_file)
    }

    /// Full path of the product catalog document.
    #[must_use]
    pub fn products_path(&self) -> PathBuf {
        self.dir.join(&self.products_file)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data = DataConfig {
            dir: get_env_or_default("STOREFRONT_DATA_DIR", "data").into(),
            cart_file: get_env_or_default("STOREFRONT_CART_FILE", "cart.json"),
            products_file: get_env_or_default("STOREFRONT_PRODUCTS_FILE", "products.json"),
        };

        Ok(Self {
            host: parse_env_or_default("STOREFRONT_HOST", "127.0.0.1")?,
            port: parse_env_or_default("STOREFRONT_PORT", "4050")?,
            data,
            uploads_dir: get_env_or_default("STOREFRONT_UPLOADS_DIR", "uploads").into(),
            static_dir: get_env_or_default("STOREFRONT_STATIC_DIR", "public").into(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Configuration for a data directory with every other setting defaulted.
    ///
    /// Used by tests and tools that do not read the environment.
    #[must_use]
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 4050,
            data: DataConfig::in_dir(dir),
            uploads_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("public"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_sample_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env_or_default(key, default)?;
    validate_sample_rate(key, rate)
}

fn validate_sample_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("sample rate must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("STOREFRONT_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_invalid() {
        let result = parse_value::<u16>("STOREFRONT_PORT", "not-a-port");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_parse_value_host() {
        let host: IpAddr = parse_value("STOREFRONT_HOST", "0.0.0.0").unwrap();
        assert!(host.is_unspecified());
    }

    #[test]
    fn test_validate_sample_rate() {
        assert!(validate_sample_rate("RATE", 0.0).is_ok());
        assert!(validate_sample_rate("RATE", 1.0).is_ok());
        assert!(validate_sample_rate("RATE", 1.5).is_err());
        assert!(validate_sample_rate("RATE", -0.1).is_err());
    }

    #[test]
    fn test_data_paths() {
        let data = DataConfig::in_dir("/srv/shop");
        assert_eq!(data.cart_path(), PathBuf::from("/srv/shop/cart.json"));
        assert_eq!(data.products_path(), PathBuf::from("/srv/shop/products.json"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::with_data_dir("data");

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4050);
    }
}
