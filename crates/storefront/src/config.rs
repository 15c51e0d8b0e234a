//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `CATALOG_API_BASE` - Base URL of the catalog REST API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STORAGE_DIR` - Shopper document root (default: ./data/shoppers)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL; an `https` URL turns on secure cookies
    pub base_url: String,
    /// Directory holding one subdirectory per shopper
    pub storage_dir: PathBuf,
    pub catalog_api: CatalogApiConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    pub sentry: SentryConfig,
}

/// Catalog REST API configuration.
#[derive(Debug, Clone)]
pub struct CatalogApiConfig {
    /// Base URL; `categories` and `products` are resolved under it
    pub base_url: Url,
    /// How long fetched collections are served from cache
    pub cache_ttl: Duration,
}

/// Error reporting settings. Reporting is off when `dsn` is unset.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_var("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_var("STOREFRONT_PORT", 3000)?,
            base_url: required_var("STOREFRONT_BASE_URL")?,
            storage_dir: var("STOREFRONT_STORAGE_DIR")
                .map_or_else(|| PathBuf::from("./data/shoppers"), PathBuf::from),
            catalog_api: CatalogApiConfig::from_env()?,
            json_logs: var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_api_base("CATALOG_API_BASE", &required_var("CATALOG_API_BASE")?)?;
        let ttl_secs: u64 = parse_var("CATALOG_CACHE_TTL_SECS", 300)?;

        Ok(Self {
            base_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: var("SENTRY_DSN"),
            environment: var("SENTRY_ENVIRONMENT"),
            sample_rate: rate_var("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: rate_var("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Non-empty value of `key`.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn required_var(key: &str) -> Result<String, ConfigError> {
    var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` into `T`, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// A sample rate in `0.0..=1.0`.
fn rate_var(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_var(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

/// Parse an API base URL, accepting only http(s).
fn parse_api_base(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}
