//! Checkout command.

use std::io::Write;

use atelier_core::cart::{CartStorage, CartStore};
use atelier_storefront::error::add_breadcrumb;
use atelier_storefront::{CheckoutHandoff, CheckoutService, ClearCartPolicy};
use tracing::info;

use super::CliError;

/// Submit the cart and print the URL to complete payment.
///
/// The cart is left untouched if checkout creation fails.
pub async fn run<S: CartStorage, C: CheckoutService>(
    cart: &mut CartStore<S>,
    service: C,
    clear_on_redirect: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let policy = if clear_on_redirect {
        ClearCartPolicy::ClearOnRedirect
    } else {
        ClearCartPolicy::Keep
    };

    let mut handoff = CheckoutHandoff::new(service).with_policy(policy);
    add_breadcrumb("checkout", "Checkout started", None);
    info!(policy = ?handoff.policy(), lines = cart.items().len(), "Submitting checkout");
    let url = handoff.submit(cart).await?;

    writeln!(out, "{url}")?;
    Ok(())
}
