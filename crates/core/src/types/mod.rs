//! Core types for Atelier.
//!
//! This module provides type-safe wrappers for Shopify identifiers and the
//! decimal helpers used for cart arithmetic.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{MoneyError, format_amount, parse_amount};
