//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for the storefront's entry points.
//! Internal failures are captured to Sentry via [`AppError::report`] before
//! the user sees a sanitized [`AppError::user_message`].

use atelier_core::cart::{CartError, StorageError};
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Cart persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout hand-off failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Cart contents cannot be summarized.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a fault worth reporting.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Shopify(_) => true,
            Self::Checkout(CheckoutError::Service(e)) => !matches!(e, ShopifyError::UserError(_)),
            _ => false,
        }
    }

    /// Capture internal errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }

    /// Message safe to show to the user.
    ///
    /// Don't expose internal error details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Shopify(ShopifyError::NotFound(what)) => format!("Not found: {what}"),
            Self::Shopify(ShopifyError::RateLimited(secs)) => {
                format!("Too many requests, try again in {secs} seconds")
            }
            Self::Shopify(_) => "External service error".to_string(),
            Self::Storage(_) => "Could not access the saved cart".to_string(),
            Self::Checkout(e) => e.user_message(),
            Self::Cart(CartError::MixedCurrency { .. }) => {
                "Cart contains items in more than one currency".to_string()
            }
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("variant_id", "gid://shopify/ProductVariant/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid quantity".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid quantity");

        let err = AppError::Shopify(ShopifyError::NotFound("linen-shirt".to_string()));
        assert_eq!(err.to_string(), "Shopify error: Not found: linen-shirt");
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Storage(StorageError::Unavailable("disk full".to_string()));
        assert_eq!(err.user_message(), "Could not access the saved cart");
        assert!(err.is_internal());

        let err = AppError::Shopify(ShopifyError::UserError("x".to_string()));
        assert_eq!(err.user_message(), "External service error");
    }

    #[test]
    fn test_checkout_user_errors_pass_through() {
        let err = AppError::Checkout(CheckoutError::Service(ShopifyError::UserError(
            "Only 2 left in stock".to_string(),
        )));
        assert_eq!(err.user_message(), "Only 2 left in stock");
        assert!(!err.is_internal());

        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert!(!err.is_internal());
    }

    #[test]
    fn test_mixed_currency_message() {
        let err = AppError::Cart(CartError::MixedCurrency {
            expected: "ILS".to_string(),
            found: "USD".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "Cart contains items in more than one currency"
        );
    }
}
