//! The cart aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CartError;
use super::line_item::{CartLineItem, CheckoutLine, NewCartLineItem};
use crate::types::VariantId;

/// Cart contents and drawer visibility.
///
/// Items keep insertion order and hold at most one line per variant. The
/// mutating methods are crate-private: outside this crate the state is only
/// changed through [`CartStore`](super::CartStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    items: Vec<CartLineItem>,
    #[serde(default)]
    is_open: bool,
}

impl CartState {
    /// Create an empty, closed cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart drawer is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a variant.
    #[must_use]
    pub fn get(&self, variant_id: &VariantId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.variant_id == variant_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines, unrounded.
    ///
    /// Assumes a single currency; see [`CartState::currency_code`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The currency shared by every line, or `None` for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MixedCurrency` when lines disagree.
    pub fn currency_code(&self) -> Result<Option<&str>, CartError> {
        let mut codes = self.items.iter().map(|item| item.currency_code.as_str());
        let Some(first) = codes.next() else {
            return Ok(None);
        };

        match codes.find(|code| *code != first) {
            Some(other) => Err(CartError::MixedCurrency {
                expected: first.to_string(),
                found: other.to_string(),
            }),
            None => Ok(Some(first)),
        }
    }

    /// Lines to submit to the Checkout Service, in cart order.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.items.iter().map(CartLineItem::checkout_line).collect()
    }

    // =========================================================================
    // Mutations (reachable only through CartStore)
    // =========================================================================

    pub(crate) fn add(&mut self, candidate: NewCartLineItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.variant_id == candidate.variant_id)
        {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(candidate.with_quantity(1));
        }
    }

    pub(crate) fn remove(&mut self, variant_id: &VariantId) {
        self.items.retain(|item| &item.variant_id != variant_id);
    }

    pub(crate) fn set_quantity(&mut self, variant_id: &VariantId, quantity: i64) {
        if quantity <= 0 {
            self.remove(variant_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.variant_id == variant_id)
        {
            item.quantity = quantity;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Restore the one-line-per-variant and quantity >= 1 invariants on data
    /// that did not come from this type's own mutations (e.g. a hand-edited
    /// snapshot). Duplicate lines are merged into the first occurrence.
    pub(crate) fn normalize(&mut self) -> usize {
        let before = self.items.len();
        let mut merged: Vec<CartLineItem> = Vec::with_capacity(before);

        for item in self.items.drain(..) {
            if item.quantity == 0 {
                continue;
            }
            if let Some(existing) = merged
                .iter_mut()
                .find(|kept| kept.variant_id == item.variant_id)
            {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                merged.push(item);
            }
        }

        self.items = merged;
        before - self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn candidate(variant: &str, price: &str, currency: &str) -> NewCartLineItem {
        NewCartLineItem {
            variant_id: VariantId::new(variant),
            product_id: ProductId::new("gid://shopify/Product/1"),
            title: format!("Product {variant}"),
            variant_title: "Default Title".to_string(),
            price: price.to_string(),
            currency_code: currency.to_string(),
            image: String::new(),
            handle: "product".to_string(),
        }
    }

    #[test]
    fn test_currency_code_empty() {
        assert_eq!(CartState::new().currency_code(), Ok(None));
    }

    #[test]
    fn test_currency_code_uniform() {
        let mut state = CartState::new();
        state.add(candidate("a", "1.00", "ILS"));
        state.add(candidate("b", "2.00", "ILS"));
        assert_eq!(state.currency_code(), Ok(Some("ILS")));
    }

    #[test]
    fn test_currency_code_mixed() {
        let mut state = CartState::new();
        state.add(candidate("a", "1.00", "ILS"));
        state.add(candidate("b", "2.00", "USD"));
        assert_eq!(
            state.currency_code(),
            Err(CartError::MixedCurrency {
                expected: "ILS".to_string(),
                found: "USD".to_string(),
            })
        );
    }

    #[test]
    fn test_set_quantity_saturates_above_u32() {
        let mut state = CartState::new();
        state.add(candidate("a", "1.00", "USD"));
        state.set_quantity(&VariantId::new("a"), i64::MAX);
        assert_eq!(state.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_add_saturates() {
        let mut state = CartState::new();
        state.add(candidate("a", "1.00", "USD"));
        state.set_quantity(&VariantId::new("a"), i64::from(u32::MAX));
        state.add(candidate("a", "1.00", "USD"));
        assert_eq!(state.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_normalize_merges_duplicates_and_drops_zero() {
        let json = r#"{
            "items": [
                {"variantId":"a","productId":"p","title":"A","variantTitle":"","price":"1.00","currencyCode":"USD","image":"","handle":"a","quantity":2},
                {"variantId":"b","productId":"p","title":"B","variantTitle":"","price":"2.00","currencyCode":"USD","image":"","handle":"b","quantity":0},
                {"variantId":"a","productId":"p","title":"A","variantTitle":"","price":"1.00","currencyCode":"USD","image":"","handle":"a","quantity":3}
            ],
            "isOpen": true
        }"#;
        let mut state: CartState = serde_json::from_str(json).unwrap();

        assert_eq!(state.normalize(), 2);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 5);
        assert!(state.is_open());
    }

    #[test]
    fn test_missing_fields_default() {
        let state: CartState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, CartState::new());
    }
}
