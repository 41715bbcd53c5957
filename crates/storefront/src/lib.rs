//! Atelier storefront library.
//!
//! Wires the cart in `atelier-core` to the outside world: the Shopify
//! Storefront API for catalog data and checkout, a JSON file for cart
//! persistence, and tracing/Sentry for observability.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod shopify;
pub mod storage;
pub mod telemetry;

pub use checkout::{CheckoutError, CheckoutHandoff, CheckoutService, CheckoutStatus, ClearCartPolicy};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use shopify::StorefrontClient;
pub use storage::JsonFileStorage;
