//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean API separate from the raw GraphQL response
//! shapes in `storefront::queries`.

use std::collections::BTreeMap;

use atelier_core::cart::NewCartLineItem;
use atelier_core::types::{CollectionId, ProductId, VariantId, parse_amount};
use serde::{Deserialize, Serialize};
use url::Url;

use super::ShopifyError;

/// Metafield namespace used for storefront customizations.
pub const CUSTOM_NAMESPACE: &str = "custom";

/// Metafield key holding a product's color swatch.
pub const COLOR_METAFIELD_KEY: &str = "color";

// =============================================================================
// Money & Image Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Product or promotional image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    /// Variant title (`"Default Title"` for products without options).
    pub title: String,
    pub price: Money,
    pub available_for_sale: bool,
}

/// Custom metadata attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub handle: String,
    pub product_type: String,
    pub images: Vec<Image>,
    pub variants: Vec<ProductVariant>,
    pub metafields: Vec<Metafield>,
}

impl Product {
    /// First image, used as thumbnail.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }

    /// Find a variant by ID.
    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Look up a metafield value.
    #[must_use]
    pub fn metafield(&self, namespace: &str, key: &str) -> Option<&str> {
        self.metafields
            .iter()
            .find(|m| m.namespace == namespace && m.key == key)
            .map(|m| m.value.as_str())
    }

    /// The `custom.color` swatch value, if set.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.metafield(CUSTOM_NAMESPACE, COLOR_METAFIELD_KEY)
    }

    /// Whether any variant can be purchased.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }

    /// Build the cart candidate for a variant (the first one if `None`).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the product has no such variant and
    /// `ShopifyError::InvalidAmount` if the variant price is not a decimal.
    pub fn to_cart_candidate(
        &self,
        variant_id: Option<&VariantId>,
    ) -> Result<NewCartLineItem, ShopifyError> {
        let variant = match variant_id {
            Some(id) => self.variant(id),
            None => self.variants.first(),
        }
        .ok_or_else(|| {
            ShopifyError::NotFound(format!(
                "Variant {} of product {}",
                variant_id.map_or("(first)", VariantId::as_str),
                self.handle
            ))
        })?;
        parse_amount(&variant.price.amount)?;

        Ok(NewCartLineItem {
            variant_id: variant.id.clone(),
            product_id: self.id.clone(),
            title: self.title.clone(),
            variant_title: variant.title.clone(),
            price: variant.price.amount.clone(),
            currency_code: variant.price.currency_code.clone(),
            image: self
                .featured_image()
                .map(|img| img.url.clone())
                .unwrap_or_default(),
            handle: self.handle.clone(),
        })
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A product collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub handle: String,
    pub products: Vec<Product>,
}

// =============================================================================
// Metaobject Types
// =============================================================================

/// One field of a metaobject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    pub value: Option<String>,
    /// Resolved image when the field references a media image.
    pub image: Option<Image>,
}

/// A merchant-defined content entry (promos, discounts, shipping copy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metaobject {
    pub id: String,
    pub fields: Vec<MetaobjectField>,
}

impl Metaobject {
    /// Find a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&MetaobjectField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Value of a field, if present and non-null.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(|f| f.value.as_deref())
    }

    /// All non-null field values keyed by field key.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|f| f.value.clone().map(|v| (f.key.clone(), v)))
            .collect()
    }
}

/// Text tone to use over a promotional image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoTone {
    /// Bright image: draw dark text.
    Bright,
    /// Dark image: draw light text.
    #[default]
    Dark,
}

impl PromoTone {
    /// Parse the `bright` field value; anything but `"bright"` is dark.
    #[must_use]
    pub fn from_field(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("bright") => Self::Bright,
            _ => Self::Dark,
        }
    }
}

/// A promotional banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoImage {
    pub id: String,
    /// Placement slot (e.g., `"hero-banner"`).
    pub placement: String,
    pub image: Image,
    pub title: String,
    pub tone: PromoTone,
}

/// Where the storefront logo sits in the header.
pub const DEFAULT_LOGO_PLACEMENT: &str = "middle";

// =============================================================================
// Checkout Types
// =============================================================================

/// Result of a successful checkout hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    /// Shopify cart backing the checkout.
    pub cart_id: String,
    /// Hosted checkout page to send the shopper to.
    pub checkout_url: Url,
}

/// A validation error returned by a checkout mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUserError {
    /// Path to the offending input field.
    pub field: Vec<String>,
    /// User-facing message.
    pub message: String,
}
