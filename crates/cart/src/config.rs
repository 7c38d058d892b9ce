//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_PATH` - File backing the durable store (default: `.storecart/storage.json`)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: `cartItems`)
//! - `CART_FORCE_EMPTY` - Discard the persisted cart on startup (default: false)
//! - `STOREFRONT_BASE_URL` - Storefront root, required for checkout
//! - `STOREFRONT_CSRF_TOKEN` - Anti-forgery token for the purchase form
//! - `STOREFRONT_SESSION_COOKIE` - `Cookie` header identifying the signed-in shopper

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::persistence::DEFAULT_KEY;

const DEFAULT_STORAGE_PATH: &str = ".storecart/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct CartConfig {
    /// File backing the durable key-value store
    pub storage_path: PathBuf,
    /// Key the cart is stored under
    pub storage_key: String,
    /// Discard the persisted cart instead of loading it
    pub force_empty: bool,
    /// Storefront root URL
    pub base_url: Option<Url>,
    /// Anti-forgery token for the purchase form
    pub csrf_token: Option<SecretString>,
    /// Session cookie for the signed-in shopper
    pub session_cookie: Option<SecretString>,
}

impl std::fmt::Debug for CartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartConfig")
            .field("storage_path", &self.storage_path)
            .field("storage_key", &self.storage_key)
            .field("force_empty", &self.force_empty)
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            storage_key: DEFAULT_KEY.to_owned(),
            force_empty: false,
            base_url: None,
            csrf_token: None,
            session_cookie: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_path = PathBuf::from(get_env_or_default(
            "CART_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_KEY);
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let force_empty = get_optional_env("CART_FORCE_EMPTY")
            .map(|value| parse_bool("CART_FORCE_EMPTY", &value))
            .transpose()?
            .unwrap_or(false);
        let base_url = get_optional_env("STOREFRONT_BASE_URL")
            .map(|value| {
                Url::parse(&value).map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            storage_path,
            storage_key,
            force_empty,
            base_url,
            csrf_token: get_optional_env("STOREFRONT_CSRF_TOKEN").map(SecretString::from),
            session_cookie: get_optional_env("STOREFRONT_SESSION_COOKIE").map(SecretString::from),
        })
    }

    /// The storefront URL, required for checkout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `STOREFRONT_BASE_URL` is unset.
    pub fn require_base_url(&self) -> Result<&Url, ConfigError> {
        self.base_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("STOREFRONT_BASE_URL".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_forms() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", " YES ").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "false").unwrap());
        assert!(!parse_bool("X", "").unwrap());
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        let err = parse_bool("CART_FORCE_EMPTY", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CART_FORCE_EMPTY"));
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "cartItems");
        assert!(!config.force_empty);
        assert!(matches!(
            config.require_base_url(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = CartConfig {
            csrf_token: Some(SecretString::from("super-secret-token")),
            ..CartConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
