//! Cache types for Storefront API responses.

use crate::shopify::types::{Collection, Metaobject, Product};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Collection(Box<Collection>),
    Metaobjects(Vec<Metaobject>),
}

/// Cache key for a catalog read.
pub fn product_key(handle: &str) -> String {
    format!("product:{handle}")
}

pub fn products_key(first: i64) -> String {
    format!("products:{first}")
}

pub fn collection_key(handle: &str, product_count: i64) -> String {
    format!("collection:{handle}:{product_count}")
}

pub fn metaobjects_key(kind: &str, first: i64) -> String {
    format!("metaobjects:{kind}:{first}")
}
