//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Uses `graphql_client` request/response envelopes for GraphQL operations
//! - Shopify is source of truth for the catalog - NO local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Checkout is never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(config.shopify()?);
//!
//! // Get a product and put its first variant in the cart
//! let product = client.get_product_by_handle("linen-shirt").await?;
//! store.add_item(product.to_cart_candidate(None)?);
//!
//! // Hand the cart off to Shopify checkout
//! let redirect = client.create_checkout(&store.checkout_lines()).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::{
    COLLECTION_PRODUCT_COUNT, DEFAULT_PRODUCT_COUNT, DEFAULT_PROMO_PLACEMENT, METAOBJECT_PAGE_SIZE,
    StorefrontClient,
};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., insufficient stock).
    #[error("User error: {0}")]
    UserError(String),

    /// A price amount could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] atelier_core::MoneyError),

    /// Shopify returned a malformed URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// Create an error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            // Include message if present
            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            // Include path if present
            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            // Include location if present
            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
