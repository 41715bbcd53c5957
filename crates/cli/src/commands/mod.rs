//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;

use atelier_storefront::config::ConfigError;
use atelier_storefront::{AppError, StorefrontClient, StorefrontConfig};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Capture internal errors to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(e) => e.report(),
            Self::Output(e) => tracing::debug!(error = %e, "Output closed"),
        }
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            Self::Output(e) => e.to_string(),
        }
    }
}

/// Build the Storefront API client for commands that need Shopify.
///
/// Local cart commands never call this, so they work without credentials.
pub fn storefront_client(config: &StorefrontConfig) -> Result<StorefrontClient, CliError> {
    Ok(StorefrontClient::new(config.shopify()?))
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::App(e.into())
    }
}

impl From<atelier_storefront::shopify::ShopifyError> for CliError {
    fn from(e: atelier_storefront::shopify::ShopifyError) -> Self {
        Self::App(e.into())
    }
}

impl From<atelier_storefront::CheckoutError> for CliError {
    fn from(e: atelier_storefront::CheckoutError) -> Self {
        Self::App(e.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_storefront_client_needs_credentials() {
        let config = StorefrontConfig::from_map(&HashMap::new()).unwrap();
        let err = storefront_client(&config).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Missing environment variable: SHOPIFY_STORE"
        );
    }

    #[test]
    fn test_storefront_client_from_credentials() {
        let config = StorefrontConfig::from_map(&HashMap::from([
            ("SHOPIFY_STORE".to_string(), "atelier.myshopify.com".to_string()),
            (
                "SHOPIFY_STOREFRONT_TOKEN".to_string(),
                "3f9a1c7be24d58e06b1fa9c3d7e25b84".to_string(),
            ),
        ]))
        .unwrap();
        let client = storefront_client(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://atelier.myshopify.com/api/2024-07/graphql.json"
        );
    }
}
