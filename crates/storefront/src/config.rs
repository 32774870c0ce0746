//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `KNITWEAR_API_BASE_URL` - Backend API base URL (default: `http://127.0.0.1:8000/api`)
//! - `KNITWEAR_API_TOKEN` - Bearer token for the order API (high entropy, not a placeholder)
//! - `KNITWEAR_STATE_DIR` - Directory for cart/wishlist snapshots (default: `.knitwear`)
//! - `KNITWEAR_ORDER_TIMEOUT_SECS` - Order submission timeout in seconds (default: 15)
//! - `KNITWEAR_CURRENCY` - Display currency code (default: INR)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use knitwear_core::Currency;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_STATE_DIR: &str = ".knitwear";
const DEFAULT_ORDER_TIMEOUT_SECS: u64 = 15;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Directory where cart and wishlist snapshots are written
    pub state_dir: PathBuf,
    /// Currency used to format prices for display
    pub currency: Currency,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Backend API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; endpoints are appended as path segments
    pub base_url: Url,
    /// Bearer token sent with order requests
    pub token: Option<SecretString>,
    /// Timeout for a single order submission
    pub order_timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("order_timeout", &self.order_timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Configuration for a local backend with no token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid http(s) URL.
    pub fn new(base_url: &str, order_timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            token: None,
            order_timeout,
        })
    }

    /// Full URL of an endpoint below the base URL, e.g. `endpoint("orders")`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the API token
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = parse_base_url(
            "KNITWEAR_API_BASE_URL",
            &get_or_default("KNITWEAR_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;

        let token = lookup("KNITWEAR_API_TOKEN")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                validate_secret_strength(&value, "KNITWEAR_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let order_timeout = get_or_default(
            "KNITWEAR_ORDER_TIMEOUT_SECS",
            &DEFAULT_ORDER_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "KNITWEAR_ORDER_TIMEOUT_SECS".to_string(),
                "must be a positive number of seconds".to_string(),
            )
        })?;

        let state_dir = PathBuf::from(get_or_default("KNITWEAR_STATE_DIR", DEFAULT_STATE_DIR));

        let currency = get_or_default("KNITWEAR_CURRENCY", Currency::default().code())
            .parse::<Currency>()
            .map_err(|e| ConfigError::InvalidEnvVar("KNITWEAR_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self {
            api: ApiConfig {
                base_url,
                token,
                order_timeout,
            },
            state_dir,
            currency,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }

    /// Configuration from a fixed map, for tests and tooling.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_default() += 1;
    }

    let len: u32 = freq.values().sum();
    if len == 0 {
        return 0.0;
    }

    freq.values()
        .map(|&count| {
            let p = f64::from(count) / f64::from(len);
            -p * p.log2()
        })
        .sum()
}

/// Reject tokens that look like placeholders or have too little entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Expose the bearer header value for a configured token.
pub(crate) fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}
