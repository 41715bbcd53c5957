//! Shopping cart state container.
//!
//! # Overview
//!
//! - [`CartLineItem`] - one variant and its quantity
//! - [`CartState`] - ordered line items plus the drawer visibility flag
//! - [`CartStore`] - the single owner of a `CartState`; every mutation goes
//!   through it and is written to the injected [`CartStorage`]
//!
//! # Example
//!
//! ```rust
//! use atelier_core::cart::{CartStore, MemoryStorage, NewCartLineItem};
//! use rust_decimal::Decimal;
//!
//! let mut store = CartStore::rehydrate(MemoryStorage::new());
//! store.add_item(NewCartLineItem {
//!     variant_id: "gid://shopify/ProductVariant/1".into(),
//!     product_id: "gid://shopify/Product/1".into(),
//!     title: "Linen Shirt".to_string(),
//!     variant_title: "M".to_string(),
//!     price: "19.99".to_string(),
//!     currency_code: "ILS".to_string(),
//!     image: String::new(),
//!     handle: "linen-shirt".to_string(),
//! });
//!
//! assert_eq!(store.item_count(), 1);
//! assert_eq!(store.subtotal(), Decimal::new(1999, 2));
//! ```

mod error;
mod line_item;
mod state;
mod storage;
mod store;

pub use error::CartError;
pub use line_item::{CartLineItem, CheckoutLine, DEFAULT_VARIANT_TITLE, NewCartLineItem};
pub use state::CartState;
pub use storage::{CartSnapshot, CartStorage, MemoryStorage, SNAPSHOT_VERSION, StorageError};
pub use store::CartStore;
