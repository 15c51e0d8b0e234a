//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_API_TOKEN` - Bearer token for category writes (min 32 chars, high entropy)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_DATA_DIR` - Catalog document directory (default: ./data/admin)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_API_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding `categories.json` and `products.json`
    pub data_dir: PathBuf,
    /// Bearer token required for category writes
    pub api_token: SecretString,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    pub sentry: SentryConfig,
}

/// Error reporting settings. Reporting is off when `dsn` is unset.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token is too weak to guard writes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_var("ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_var("ADMIN_PORT", 3001)?,
            data_dir: var("ADMIN_DATA_DIR").map_or_else(|| PathBuf::from("./data/admin"), PathBuf::from),
            api_token: api_token_var("ADMIN_API_TOKEN")?,
            json_logs: var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            sentry: SentryConfig {
                dsn: var("SENTRY_DSN"),
                environment: var("SENTRY_ENVIRONMENT"),
                sample_rate: rate_var("SENTRY_SAMPLE_RATE", 1.0)?,
                traces_sample_rate: rate_var("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
            },
        })
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

/// Non-empty value of `key`.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
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

/// Load the API token from `key` and check its strength.
fn api_token_var(key: &str) -> Result<SecretString, ConfigError> {
    let value = var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    check_api_token(&value).map_err(|reason| ConfigError::InsecureSecret(key.to_string(), reason))?;
    Ok(SecretString::from(value))
}

/// Reject tokens that are short, look like a template value, or were typed
/// by hand rather than generated.
fn check_api_token(token: &str) -> Result<(), String> {
    if token.len() < MIN_API_TOKEN_LENGTH {
        return Err(format!(
            "must be at least {MIN_API_TOKEN_LENGTH} characters (got {})",
            token.len()
        ));
    }

    let lower = token.to_ascii_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("looks like a placeholder (contains '{pattern}')"));
    }

    let entropy = bits_per_byte(token.as_bytes());
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}); generate it with `openssl rand -base64 32`"
        ));
    }

    Ok(())
}

/// Shannon entropy of a byte string in bits per byte.
#[allow(clippy::cast_precision_loss)] // token lengths are far below 2^52
fn bits_per_byte(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }

    let mut counts = [0_usize; 256];
    for &b in bytes {
        if let Some(n) = counts.get_mut(usize::from(b)) {
            *n += 1;
        }
    }

    let len = bytes.len() as f64;
    counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GENERATED: &str = "q7Vt2xLr9KpB4mZc8WnJ3yHs6DfG1aE5";

    #[test]
    fn test_bits_per_byte() {
        assert!(bits_per_byte(b"").abs() < f64::EPSILON);
        assert!(bits_per_byte(b"aaaaaaaa").abs() < f64::EPSILON);
        assert!((bits_per_byte(b"abab") - 1.0).abs() < 1e-9);
        assert!((bits_per_byte(b"abcd") - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_generated_token_passes() {
        assert!(check_api_token(GENERATED).is_ok());
    }

    #[test]
    fn test_short_token_rejected() {
        let reason = check_api_token("q7Vt2xLr9KpB").unwrap_err();
        assert!(reason.contains("at least 32"));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let reason = check_api_token("replace-me-with-a-real-admin-api-token").unwrap_err();
        assert!(reason.contains("placeholder"));
    }

    #[test]
    fn test_repetitive_token_rejected() {
        let reason = check_api_token(&"ab".repeat(20)).unwrap_err();
        assert!(reason.contains("entropy"));
    }

    #[test]
    fn test_rate_var_default_when_unset() {
        let rate = rate_var("PIKO_PEARL_TEST_UNSET_ADMIN_RATE", 0.25).unwrap();
        assert!((rate - 0.25).abs() < f32::EPSILON);
    }

    fn config(token: &str) -> AdminConfig {
        AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            data_dir: PathBuf::from("./data/admin"),
            api_token: SecretString::from(token),
            json_logs: false,
            sentry: SentryConfig::default(),
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config(GENERATED).socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let debug_output = format!("{:?}", config("super_sensitive_token_value_0123456789"));
        assert!(debug_output.contains("data/admin"));
        assert!(!debug_output.contains("super_sensitive_token_value"));
    }
}
