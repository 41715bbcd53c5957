//! Cart error types.

use thiserror::Error;

/// Errors raised by cart queries.
///
/// Mutations never fail; only questions the cart cannot answer honestly
/// produce an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Line items are priced in more than one currency.
    #[error("cart mixes currencies: {expected} and {found}")]
    MixedCurrency { expected: String, found: String },
}
