//! Atelier Core - Cart domain and shared types.
//!
//! This crate provides the pieces of the storefront that carry real state:
//! - [`cart`] - The shopping cart state container and its persistence seam
//! - [`types`] - Newtype wrappers for Shopify IDs and money helpers
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no network, no filesystem.
//! Persistence is reached through the [`cart::CartStorage`] trait, which the
//! `storefront` crate implements on top of the filesystem and tests implement
//! in memory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{
    CartError, CartLineItem, CartSnapshot, CartState, CartStorage, CartStore, CheckoutLine,
    MemoryStorage, NewCartLineItem, StorageError,
};
pub use types::*;
