//! Cart store behavior against file-backed storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use atelier_core::cart::{CartStorage, CartStore};
use atelier_core::types::VariantId;
use atelier_integration_tests::candidate;
use atelier_storefront::JsonFileStorage;
use rust_decimal::Decimal;

#[test]
fn cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut cart = CartStore::rehydrate(JsonFileStorage::new(dir.path(), "cart-storage"));
        cart.add_item(candidate("v-a", "Linen Shirt", "19.99"));
        cart.add_item(candidate("v-b", "Wool Scarf", "5.00"));
        cart.add_item(candidate("v-c", "Canvas Tote", "32.50"));
        cart.add_item(candidate("v-a", "Linen Shirt", "19.99"));
        cart.update_quantity(&VariantId::new("v-c"), 4);
        cart.open_cart();
    }

    let cart = CartStore::rehydrate(JsonFileStorage::new(dir.path(), "cart-storage"));

    let ids: Vec<&str> = cart.items().iter().map(|i| i.variant_id.as_str()).collect();
    assert_eq!(ids, ["v-a", "v-b", "v-c"]);
    assert_eq!(cart.item_count(), 7);
    // 19.99 * 2 + 5.00 + 32.50 * 4
    assert_eq!(cart.subtotal(), Decimal::new(17498, 2));
    assert!(cart.is_open());
    assert_eq!(cart.items()[1].price, "5.00");
}

#[test]
fn cleared_cart_stays_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path(), "cart-storage");

    let mut cart = CartStore::rehydrate(&storage);
    cart.add_item(candidate("v-a", "Linen Shirt", "19.99"));
    cart.open_cart();
    cart.clear_cart();

    let reloaded = CartStore::rehydrate(&storage);
    assert!(reloaded.is_empty());
    assert!(reloaded.is_open());
}

#[test]
fn snapshot_written_by_hand_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path(), "cart-storage");
    let item = |variant: &str, quantity: u32| {
        serde_json::json!({
            "variantId": variant,
            "productId": "gid://shopify/Product/1",
            "title": "Linen Shirt",
            "variantTitle": "Default Title",
            "price": "10.00",
            "currencyCode": "ILS",
            "image": "",
            "handle": "linen-shirt",
            "quantity": quantity,
        })
    };
    let snapshot = serde_json::json!({
        "state": {"items": [item("a", 1), item("b", 0), item("a", 2)], "isOpen": false},
        "version": 0,
    });
    std::fs::write(storage.path(), snapshot.to_string()).unwrap();

    let cart = CartStore::rehydrate(&storage);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn newer_snapshot_version_starts_empty_without_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path(), "cart-storage");
    let raw = r#"{"state":{"items":[],"isOpen":true},"version":7}"#;
    std::fs::write(storage.path(), raw).unwrap();

    let cart = CartStore::rehydrate(&storage);
    assert!(cart.is_empty());
    assert!(!cart.is_open());
    assert!(storage.load().unwrap().is_some());
    assert_eq!(std::fs::read_to_string(storage.path()).unwrap(), raw);
}

#[test]
fn prices_are_saved_exactly_as_received() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::new(dir.path(), "cart-storage");

    let mut cart = CartStore::rehydrate(&storage);
    cart.add_item(candidate("v-a", "Linen Shirt", "0.12345678901234567890123456789"));
    cart.add_item(candidate("v-b", "Wool Scarf", "1e2"));
    cart.add_item(candidate("v-c", "Canvas Tote", "+5.00"));

    let mut reloaded = CartStore::rehydrate(&storage);
    reloaded.toggle_cart();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
    let prices: Vec<&str> = saved["state"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["price"].as_str().unwrap())
        .collect();
    assert_eq!(prices, ["0.12345678901234567890123456789", "1e2", "+5.00"]);
}
