//! Integration tests for Atelier.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store against file-backed storage
//! - `checkout_handoff` - Cart to checkout hand-off against a fake service
//!
//! Shared fixtures live here so each test file stays focused on behavior.

use std::sync::Mutex;

use atelier_core::cart::{CheckoutLine, NewCartLineItem};
use atelier_core::types::{ProductId, VariantId};
use atelier_storefront::CheckoutService;
use atelier_storefront::shopify::{CheckoutRedirect, ShopifyError};
use url::Url;

/// Build a cart candidate priced in ILS.
#[must_use]
pub fn candidate(variant: &str, title: &str, price: &str) -> NewCartLineItem {
    NewCartLineItem {
        variant_id: VariantId::new(variant),
        product_id: ProductId::new(format!("gid://shopify/Product/{title}")),
        title: title.to_string(),
        variant_title: "Default Title".to_string(),
        price: price.to_string(),
        currency_code: "ILS".to_string(),
        image: format!("https://cdn.shopify.com/{title}.jpg"),
        handle: title.to_lowercase().replace(' ', "-"),
    }
}

/// Checkout service answering from a script and recording what it was sent.
#[derive(Debug, Default)]
pub struct ScriptedCheckout {
    failures_left: Mutex<u32>,
    submissions: Mutex<Vec<Vec<CheckoutLine>>>,
}

impl ScriptedCheckout {
    /// A service that fails the first `failures` calls with a stock error.
    #[must_use]
    pub fn failing_first(failures: u32) -> Self {
        Self {
            failures_left: Mutex::new(failures),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Every batch of lines submitted so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock was poisoned by a panicking test.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn submissions(&self) -> Vec<Vec<CheckoutLine>> {
        self.submissions.lock().unwrap().clone()
    }
}

impl CheckoutService for ScriptedCheckout {
    #[allow(clippy::unwrap_used)]
    async fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> Result<CheckoutRedirect, ShopifyError> {
        self.submissions.lock().unwrap().push(lines.to_vec());

        let mut failures_left = self.failures_left.lock().unwrap();
        if *failures_left > 0 {
            *failures_left -= 1;
            return Err(ShopifyError::UserError(
                "Only 1 item left in stock".to_string(),
            ));
        }

        Ok(CheckoutRedirect {
            cart_id: "gid://shopify/Cart/c1".to_string(),
            checkout_url: Url::parse("https://atelier.myshopify.com/cart/c/c1")?,
        })
    }
}
