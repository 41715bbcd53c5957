//! The cart store: sole owner and mutator of a `CartState`.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::CartError;
use super::line_item::{CartLineItem, CheckoutLine, NewCartLineItem};
use super::state::CartState;
use super::storage::{CartSnapshot, CartStorage};
use crate::types::VariantId;

/// Shopping cart with write-through persistence.
///
/// Each consumer gets its own instance (or a handle to one), so tests can
/// build a fresh store per case. Mutations never fail: the in-memory state is
/// authoritative and persistence is best-effort, with write errors logged and
/// dropped.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Create an empty store without reading storage.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            state: CartState::new(),
            storage,
        }
    }

    /// Create a store from whatever snapshot `storage` holds.
    ///
    /// Missing, corrupt, or newer-format snapshots yield an empty cart; the
    /// failure is logged and startup continues.
    pub fn rehydrate(storage: S) -> Self {
        let state = match storage.load().and_then(|snapshot| {
            snapshot.map(CartSnapshot::into_state).transpose()
        }) {
            Ok(Some(mut state)) => {
                let dropped = state.normalize();
                if dropped > 0 {
                    warn!(dropped, "Normalized invalid lines in persisted cart");
                }
                for item in state.items() {
                    if let Err(e) = item.unit_price() {
                        warn!(
                            variant_id = %item.variant_id,
                            error = %e,
                            "Persisted line has an unusable price"
                        );
                    }
                }
                debug!(lines = state.items().len(), "Rehydrated cart");
                state
            }
            Ok(None) => CartState::new(),
            Err(e) => {
                warn!(error = %e, "Failed to rehydrate cart, starting empty");
                CartState::new()
            }
        };

        Self { state, storage }
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    /// Add one unit of a variant.
    ///
    /// An existing line for the same variant gets its quantity bumped by one;
    /// otherwise a new line with quantity 1 is appended.
    pub fn add_item(&mut self, candidate: NewCartLineItem) {
        self.state.add(candidate);
        self.persist();
    }

    /// Remove the line for a variant. Unknown variants are ignored.
    pub fn remove_item(&mut self, variant_id: &VariantId) {
        self.state.remove(variant_id);
        self.persist();
    }

    /// Set a line's quantity.
    ///
    /// `quantity <= 0` removes the line. Positive values replace the quantity
    /// outright. Unknown variants are ignored; no line is created.
    pub fn update_quantity(&mut self, variant_id: &VariantId, quantity: i64) {
        self.state.set_quantity(variant_id, quantity);
        self.persist();
    }

    /// Remove every line. Drawer visibility is left alone.
    pub fn clear_cart(&mut self) {
        self.state.clear();
        self.persist();
    }

    // =========================================================================
    // Drawer visibility
    // =========================================================================

    /// Flip drawer visibility.
    pub fn toggle_cart(&mut self) {
        let open = !self.state.is_open();
        self.state.set_open(open);
        self.persist();
    }

    /// Show the drawer.
    pub fn open_cart(&mut self) {
        self.state.set_open(true);
        self.persist();
    }

    /// Hide the drawer.
    pub fn close_cart(&mut self) {
        self.state.set_open(false);
        self.persist();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Total units in the cart (not distinct lines).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Sum of `price * quantity`, assuming a single currency.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.state.subtotal()
    }

    /// Currency shared by all lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MixedCurrency` when lines disagree.
    pub fn currency_code(&self) -> Result<Option<&str>, CartError> {
        self.state.currency_code()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.state.items()
    }

    /// Whether the drawer is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// The full state, read-only.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Lines for the Checkout Service, 1:1 with cart items.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<CheckoutLine> {
        self.state.checkout_lines()
    }

    /// The injected storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        let snapshot = CartSnapshot::new(self.state.clone());
        if let Err(e) = self.storage.save(&snapshot) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::MemoryStorage;
    use crate::types::ProductId;

    fn candidate(variant: &str, price: &str) -> NewCartLineItem {
        NewCartLineItem {
            variant_id: VariantId::new(variant),
            product_id: ProductId::new(format!("product-{variant}")),
            title: format!("Item {variant}"),
            variant_title: "Default Title".to_string(),
            price: price.to_string(),
            currency_code: "USD".to_string(),
            image: format!("https://cdn.example.com/{variant}.jpg"),
            handle: format!("item-{variant}"),
        }
    }

    fn ids<S: CartStorage>(store: &CartStore<S>) -> Vec<&str> {
        store.items().iter().map(|i| i.variant_id.as_str()).collect()
    }

    fn v(id: &str) -> VariantId {
        VariantId::new(id)
    }

    #[test]
    fn test_empty_cart() {
        let store = CartStore::new(MemoryStorage::new());
        assert!(store.items().is_empty());
        assert_eq!(store.item_count(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
        assert!(!store.is_open());
    }

    #[test]
    fn test_duplicate_add_increments() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "10.00"));
        store.add_item(candidate("a", "10.00"));

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
    }

    #[test]
    fn test_readd_after_remove_moves_to_end() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.add_item(candidate("b", "1.00"));
        store.remove_item(&v("a"));
        store.add_item(candidate("a", "1.00"));

        assert_eq!(ids(&store), vec!["b", "a"]);
        assert_eq!(store.items()[1].quantity, 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = CartStore::new(MemoryStorage::new());
        for id in ["a", "b", "c", "d"] {
            store.add_item(candidate(id, "1.00"));
        }
        store.remove_item(&v("b"));
        assert_eq!(ids(&store), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.remove_item(&v("missing"));
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_update_quantity_zero_and_negative_remove() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.add_item(candidate("b", "1.00"));

        store.update_quantity(&v("a"), 0);
        store.update_quantity(&v("b"), -5);

        assert!(store.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.add_item(candidate("a", "1.00"));
        store.update_quantity(&v("a"), 7);

        assert_eq!(store.items()[0].quantity, 7);
        assert_eq!(store.item_count(), 7);
    }

    #[test]
    fn test_update_quantity_unknown_does_not_create() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.update_quantity(&v("ghost"), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_item_count_counts_units() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.add_item(candidate("b", "1.00"));
        store.update_quantity(&v("b"), 4);
        assert_eq!(store.item_count(), 5);
    }

    #[test]
    fn test_subtotal() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "19.99"));
        store.add_item(candidate("a", "19.99"));
        store.add_item(candidate("b", "5.00"));

        assert_eq!(store.subtotal(), Decimal::new(4498, 2));
    }

    #[test]
    fn test_clear_keeps_visibility() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.open_cart();
        store.clear_cart();

        assert!(store.is_empty());
        assert!(store.is_open());
    }

    #[test]
    fn test_visibility_transitions_leave_items_alone() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        let before = store.items().to_vec();

        store.toggle_cart();
        assert!(store.is_open());
        store.toggle_cart();
        assert!(!store.is_open());
        store.open_cart();
        store.open_cart();
        assert!(store.is_open());
        store.close_cart();
        assert!(!store.is_open());

        assert_eq!(store.items(), before.as_slice());
    }

    #[test]
    fn test_item_mutations_leave_visibility_alone() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.open_cart();
        store.add_item(candidate("a", "1.00"));
        store.update_quantity(&v("a"), 3);
        store.remove_item(&v("a"));
        assert!(store.is_open());
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::new(storage.clone());

        store.add_item(candidate("a", "1.00"));
        store.update_quantity(&v("a"), 2);
        store.toggle_cart();
        store.remove_item(&v("a"));
        store.clear_cart();

        assert_eq!(storage.write_count(), 5);
    }

    #[test]
    fn test_rehydrate_round_trip() {
        let storage = MemoryStorage::new();
        {
            let mut store = CartStore::new(storage.clone());
            store.add_item(candidate("a", "19.99"));
            store.add_item(candidate("b", "5.00"));
            store.add_item(candidate("c", "0.10"));
            store.update_quantity(&v("b"), 3);
        }

        let reloaded = CartStore::rehydrate(storage);
        assert_eq!(ids(&reloaded), vec!["a", "b", "c"]);
        assert_eq!(reloaded.items()[1].quantity, 3);
        assert_eq!(reloaded.items()[1].price, "5.00");
    }

    #[test]
    fn test_resave_keeps_prices_verbatim() {
        let prices = ["0.12345678901234567890123456789", "1e2", "+5.00", "19.990"];
        let items: Vec<String> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                format!(
                    r#"{{"variantId":"v{i}","productId":"p","title":"T","variantTitle":"","price":"{price}","currencyCode":"USD","image":"","handle":"t","quantity":1}}"#
                )
            })
            .collect();
        let raw = format!(
            r#"{{"state":{{"items":[{}],"isOpen":false}},"version":0}}"#,
            items.join(",")
        );

        let mut store = CartStore::rehydrate(MemoryStorage::with_raw(raw));
        store.toggle_cart();

        let saved = store.storage().raw().unwrap();
        let snapshot: serde_json::Value = serde_json::from_str(&saved).unwrap();
        for (i, price) in prices.iter().enumerate() {
            assert_eq!(snapshot["state"]["items"][i]["price"], *price);
        }
        assert_eq!(store.storage().write_count(), 1);
    }

    #[test]
    fn test_subtotal_parses_stored_prices() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1e2"));
        store.add_item(candidate("b", "+5.00"));
        store.add_item(candidate("c", "not a price"));

        assert_eq!(store.subtotal(), Decimal::new(105, 0));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut store = CartStore::new(storage.clone());

        store.add_item(candidate("a", "1.00"));

        assert_eq!(store.item_count(), 1);
        assert_eq!(storage.write_count(), 0);
        assert!(storage.raw().is_none());
    }

    #[test]
    fn test_rehydrate_corrupt_snapshot_starts_empty() {
        let store = CartStore::rehydrate(MemoryStorage::with_raw("{{{"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rehydrate_future_version_starts_empty() {
        let store = CartStore::rehydrate(MemoryStorage::with_raw(
            r#"{"state":{"items":[],"isOpen":true},"version":99}"#,
        ));
        assert!(store.is_empty());
        assert!(!store.is_open());
    }

    #[test]
    fn test_checkout_lines_mirror_items() {
        let mut store = CartStore::new(MemoryStorage::new());
        store.add_item(candidate("a", "1.00"));
        store.add_item(candidate("b", "1.00"));
        store.update_quantity(&v("b"), 4);

        let lines = store.checkout_lines();
        assert_eq!(
            lines,
            vec![
                CheckoutLine {
                    variant_id: v("a"),
                    quantity: 1
                },
                CheckoutLine {
                    variant_id: v("b"),
                    quantity: 4
                },
            ]
        );
    }
}
