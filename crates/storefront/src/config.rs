//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Shopify (required for catalog reads and checkout)
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., atelier.myshopify.com)
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API public access token
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-07)
//!
//! The cart works without any Shopify settings. Setting only one of the two
//! required variables is an error.
//!
//! ## Optional
//! - `ATELIER_CART_DIR` - Directory holding the persisted cart (default: .atelier)
//! - `ATELIER_CART_KEY` - Name of the persisted cart entry (default: cart-storage)
//! - `ATELIER_DEFAULT_ANNOUNCEMENT` - Announcement shown when no discount is published
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-07";
const DEFAULT_CART_DIR: &str = ".atelier";
/// Storage key of the cart snapshot.
pub const DEFAULT_CART_KEY: &str = "cart-storage";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Announcement used when the shop publishes no discount metaobjects.
pub const DEFAULT_ANNOUNCEMENT: &str = "20% הנחה בקנייה מעל מאה שקל WELCOME20";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Shopify Storefront API configuration, if credentials are set
    pub shopify: Option<ShopifyStorefrontConfig>,
    /// Where the cart snapshot lives
    pub cart: CartStorageConfig,
    /// Fallback announcement bar text
    pub default_announcement: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., atelier.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-07)
    pub api_version: String,
    /// Storefront API access token
    pub storefront_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyStorefrontConfig {
    /// Expose the access token for request headers.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.storefront_token.expose_secret()
    }

    /// GraphQL endpoint of the Storefront API.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store, self.api_version
        )
    }
}

/// Location of the persisted cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartStorageConfig {
    /// Directory holding the snapshot file
    pub dir: PathBuf,
    /// Entry name; the file is `<dir>/<key>.json`
    pub key: String,
}

impl Default for CartStorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CART_DIR),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// still hold template placeholders.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let has_credentials = env.optional("SHOPIFY_STORE").is_some()
            || env.optional("SHOPIFY_STOREFRONT_TOKEN").is_some();
        let shopify = if has_credentials {
            Some(ShopifyStorefrontConfig {
                store: validate_store_domain(&env.required("SHOPIFY_STORE")?)?,
                api_version: env.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
                storefront_token: env.validated_secret("SHOPIFY_STOREFRONT_TOKEN")?,
            })
        } else {
            None
        };

        let cart = CartStorageConfig {
            dir: PathBuf::from(env.or_default("ATELIER_CART_DIR", DEFAULT_CART_DIR)),
            key: validate_cart_key(&env.or_default("ATELIER_CART_KEY", DEFAULT_CART_KEY))?,
        };

        let log_format = env
            .optional("LOG_FORMAT")
            .map(|v| {
                v.parse::<LogFormat>()
                    .map_err(|e| ConfigError::InvalidEnvVar("LOG_FORMAT".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            shopify,
            cart,
            default_announcement: env
                .or_default("ATELIER_DEFAULT_ANNOUNCEMENT", DEFAULT_ANNOUNCEMENT),
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Build a configuration from a fixed map (handy in tests).
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Shopify settings, for commands that talk to the Storefront API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no Shopify credentials were set.
    pub fn shopify(&self) -> Result<&ShopifyStorefrontConfig, ConfigError> {
        self.shopify
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate the store domain: bare host, no scheme, no placeholder.
fn validate_store_domain(value: &str) -> Result<String, ConfigError> {
    let domain = value.trim().trim_end_matches('/');

    if domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPIFY_STORE".to_string(),
            format!("expected a bare domain like atelier.myshopify.com, got '{domain}'"),
        ));
    }

    let lower = domain.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPIFY_STORE".to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    Ok(domain.to_string())
}

/// Cart keys become file names, so keep them to a safe alphabet.
fn validate_cart_key(value: &str) -> Result<String, ConfigError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(value.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ATELIER_CART_KEY".to_string(),
            "only ASCII letters, digits, '-' and '_' are allowed".to_string(),
        ))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Token length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Storefront tokens are 32 hex characters, which sit around 3.5-4 bits/char
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOKEN: &str = "3f9a1c7be24d58e06b1fa9c3d7e25b84";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn minimal() -> HashMap<String, String> {
        vars(&[
            ("SHOPIFY_STORE", "atelier.myshopify.com"),
            ("SHOPIFY_STOREFRONT_TOKEN", TOKEN),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_map(&minimal()).unwrap();
        let shopify = config.shopify().unwrap();
        assert_eq!(shopify.api_version, "2024-07");
        assert_eq!(shopify.access_token(), TOKEN);
        assert_eq!(config.cart, CartStorageConfig::default());
        assert_eq!(config.default_announcement, DEFAULT_ANNOUNCEMENT);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_cart_settings_load_without_shopify() {
        let env = vars(&[("ATELIER_CART_DIR", "/tmp/carts")]);
        let config = StorefrontConfig::from_map(&env).unwrap();

        assert!(config.shopify.is_none());
        assert_eq!(config.cart.dir, PathBuf::from("/tmp/carts"));
        assert!(matches!(
            config.shopify(),
            Err(ConfigError::MissingEnvVar(key)) if key == "SHOPIFY_STORE"
        ));
    }

    #[test]
    fn test_token_without_store() {
        let env = vars(&[("SHOPIFY_STOREFRONT_TOKEN", TOKEN)]);
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::MissingEnvVar(key)) if key == "SHOPIFY_STORE"
        ));
    }

    #[test]
    fn test_graphql_endpoint() {
        let config = StorefrontConfig::from_map(&minimal()).unwrap();
        assert_eq!(
            config.shopify().unwrap().graphql_endpoint(),
            "https://atelier.myshopify.com/api/2024-07/graphql.json"
        );
    }

    #[test]
    fn test_missing_store() {
        let mut env = minimal();
        env.remove("SHOPIFY_STORE");
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::MissingEnvVar(key)) if key == "SHOPIFY_STORE"
        ));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut env = minimal();
        env.insert("SHOPIFY_STOREFRONT_TOKEN".to_string(), "  ".to_string());
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::MissingEnvVar(key)) if key == "SHOPIFY_STOREFRONT_TOKEN"
        ));
    }

    #[test]
    fn test_template_store_rejected() {
        let mut env = minimal();
        env.insert(
            "SHOPIFY_STORE".to_string(),
            "your-store.myshopify.com".to_string(),
        );
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_store_with_scheme_rejected() {
        let mut env = minimal();
        env.insert(
            "SHOPIFY_STORE".to_string(),
            "https://atelier.myshopify.com".to_string(),
        );
        assert!(StorefrontConfig::from_map(&env).is_err());
    }

    #[test]
    fn test_template_token_rejected() {
        let mut env = minimal();
        env.insert(
            "SHOPIFY_STOREFRONT_TOKEN".to_string(),
            "your-storefront-access-token".to_string(),
        );
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "T").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut env = minimal();
        env.insert("SHOPIFY_API_VERSION".to_string(), "2025-01".to_string());
        env.insert("ATELIER_CART_DIR".to_string(), "/tmp/carts".to_string());
        env.insert("ATELIER_CART_KEY".to_string(), "tab_1".to_string());
        env.insert("LOG_FORMAT".to_string(), "JSON".to_string());

        let config = StorefrontConfig::from_map(&env).unwrap();
        assert_eq!(config.shopify().unwrap().api_version, "2025-01");
        assert_eq!(config.cart.dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.cart.key, "tab_1");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_cart_key_with_path_separator_rejected() {
        let mut env = minimal();
        env.insert("ATELIER_CART_KEY".to_string(), "../escape".to_string());
        assert!(StorefrontConfig::from_map(&env).is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut env = minimal();
        env.insert("LOG_FORMAT".to_string(), "xml".to_string());
        assert!(matches!(
            StorefrontConfig::from_map(&env),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "LOG_FORMAT"
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = StorefrontConfig::from_map(&minimal()).unwrap();
        let debug = format!("{:?}", config.shopify().unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(TOKEN));
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }
}
