//! Checkout hand-off.
//!
//! Submits the cart's lines to a [`CheckoutService`] and reports the hosted
//! checkout URL to redirect to. The cart itself never orchestrates checkout;
//! [`CheckoutHandoff`] owns sequencing, the processing flag and error
//! surfacing.
//!
//! Failures leave the cart untouched so the shopper can retry. No timeout is
//! imposed on the service call: a request that never resolves keeps the
//! hand-off in [`CheckoutStatus::Processing`].

use std::future::Future;

use atelier_core::cart::{CartStorage, CartStore, CheckoutLine};
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

use crate::shopify::ShopifyError;
use crate::shopify::types::CheckoutRedirect;

/// Message shown when checkout creation fails for a non-validation reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to create checkout. Please try again.";

/// Remote service that turns cart lines into a hosted checkout.
pub trait CheckoutService {
    /// Create a checkout for `lines` and return where to send the shopper.
    fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> impl Future<Output = Result<CheckoutRedirect, ShopifyError>> + Send;
}

impl<T: CheckoutService> CheckoutService for &T {
    fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> impl Future<Output = Result<CheckoutRedirect, ShopifyError>> + Send {
        (**self).create_checkout(lines)
    }
}

/// What to do with the local cart once the shopper is redirected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearCartPolicy {
    /// Leave the cart as is; the hosted checkout owns the purchase from here.
    #[default]
    Keep,
    /// Empty the cart as soon as a checkout URL is obtained.
    ClearOnRedirect,
}

/// Progress of a checkout hand-off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutStatus {
    #[default]
    Idle,
    /// Waiting on the checkout service. Further submissions are refused.
    Processing,
    /// Checkout created; the shopper should be sent to this URL.
    Redirecting(Url),
    /// Checkout creation failed with this user-facing message. Retryable.
    Failed(String),
}

/// Errors from a checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("Cart is empty")]
    EmptyCart,

    /// A submission is already in flight.
    #[error("Checkout already in progress")]
    AlreadyProcessing,

    /// The checkout service failed.
    #[error("Checkout service error: {0}")]
    Service(#[from] ShopifyError),
}

impl CheckoutError {
    /// Message safe to show to the shopper.
    ///
    /// Validation messages from the checkout service (e.g., stock limits) are
    /// shown as is; everything else collapses to a generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::AlreadyProcessing => "Checkout is already in progress".to_string(),
            Self::Service(ShopifyError::UserError(message)) => message.clone(),
            Self::Service(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Drives one shopper's checkout hand-off.
#[derive(Debug)]
pub struct CheckoutHandoff<C> {
    service: C,
    policy: ClearCartPolicy,
    status: CheckoutStatus,
}

impl<C: CheckoutService> CheckoutHandoff<C> {
    /// Create an idle hand-off that keeps the cart after redirecting.
    pub fn new(service: C) -> Self {
        Self {
            service,
            policy: ClearCartPolicy::default(),
            status: CheckoutStatus::Idle,
        }
    }

    /// Set what happens to the cart after a successful hand-off.
    #[must_use]
    pub const fn with_policy(mut self, policy: ClearCartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configured clear-cart policy.
    #[must_use]
    pub const fn policy(&self) -> ClearCartPolicy {
        self.policy
    }

    #[must_use]
    pub const fn status(&self) -> &CheckoutStatus {
        &self.status
    }

    /// Whether the checkout control should be disabled.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.status, CheckoutStatus::Processing)
    }

    /// Submit the cart to the checkout service.
    ///
    /// On success the hand-off moves to `Redirecting` and the URL is
    /// returned; under [`ClearCartPolicy::ClearOnRedirect`] the cart is
    /// emptied first. On failure the hand-off moves to `Failed` with a
    /// user-facing message and the cart is left untouched.
    ///
    /// If a previous submission was dropped mid-flight the hand-off stays
    /// `Processing` until [`reset`](Self::reset) is called.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart,
    /// `CheckoutError::AlreadyProcessing` while a submission is in flight,
    /// or `CheckoutError::Service` if the checkout service fails.
    #[instrument(skip_all, fields(lines = cart.items().len()))]
    pub async fn submit<S: CartStorage>(
        &mut self,
        cart: &mut CartStore<S>,
    ) -> Result<Url, CheckoutError> {
        if self.is_processing() {
            return Err(CheckoutError::AlreadyProcessing);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart.checkout_lines();
        self.status = CheckoutStatus::Processing;

        match self.service.create_checkout(&lines).await {
            Ok(redirect) => {
                info!(cart_id = %redirect.cart_id, "Checkout created, redirecting");
                if self.policy == ClearCartPolicy::ClearOnRedirect {
                    cart.clear_cart();
                }
                self.status = CheckoutStatus::Redirecting(redirect.checkout_url.clone());
                Ok(redirect.checkout_url)
            }
            Err(e) => {
                let err = CheckoutError::from(e);
                error!(error = %err, "Checkout error");
                self.status = CheckoutStatus::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// Return to `Idle`, e.g. after the failure notice was dismissed.
    pub fn reset(&mut self) {
        self.status = CheckoutStatus::Idle;
    }
}
