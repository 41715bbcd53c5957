//! Newtype IDs for type-safe Shopify references.
//!
//! Shopify identifies everything with opaque global IDs
//! (`gid://shopify/ProductVariant/123`). Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing a product ID with a variant ID.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use atelier_core::define_id;
/// define_id!(LocationId);
/// define_id!(ShopId);
///
/// let location = LocationId::new("gid://shopify/Location/1");
/// let shop = ShopId::new("gid://shopify/Shop/1");
///
/// // These are different types, so this won't compile:
/// // let _: LocationId = shop;
/// assert_eq!(location.as_str(), "gid://shopify/Location/1");
/// # let _ = shop;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_raw_gid() {
        let id = VariantId::new("gid://shopify/ProductVariant/42");
        assert_eq!(id.to_string(), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::from("gid://shopify/Product/7");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"gid://shopify/Product/7\"");

        let back: ProductId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_empty_id_is_allowed() {
        // Validation of IDs is the caller's concern.
        let id = VariantId::new("");
        assert_eq!(id.as_str(), "");
    }
}
