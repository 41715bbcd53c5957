//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MoneyError, ProductId, VariantId, parse_amount};

/// Variant title Shopify assigns to products without options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// A line item candidate before it enters the cart.
///
/// The quantity is implied: adding a candidate always counts as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartLineItem {
    /// Purchasable variant (unique key within a cart).
    pub variant_id: VariantId,
    /// Parent product (informational only).
    pub product_id: ProductId,
    /// Product title.
    pub title: String,
    /// Variant title (e.g., "M / Blue").
    pub variant_title: String,
    /// Unit price exactly as the catalog sent it (e.g., `"19.99"`).
    ///
    /// Kept verbatim so saved carts never rewrite it; parsed only for totals.
    pub price: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Thumbnail URL (may be empty).
    pub image: String,
    /// Product handle for linking back to the product page.
    pub handle: String,
}

impl NewCartLineItem {
    /// Turn the candidate into a cart line with the given quantity.
    #[must_use]
    pub fn with_quantity(self, quantity: u32) -> CartLineItem {
        CartLineItem {
            variant_id: self.variant_id,
            product_id: self.product_id,
            title: self.title,
            variant_title: self.variant_title,
            price: self.price,
            currency_code: self.currency_code,
            image: self.image,
            handle: self.handle,
            quantity,
        }
    }
}

/// One row in the cart: a variant and how many units of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub title: String,
    pub variant_title: String,
    pub price: String,
    pub currency_code: String,
    pub image: String,
    pub handle: String,
    /// Number of units, always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// The unit price as a decimal.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if the stored price is not a decimal amount.
    pub fn unit_price(&self) -> Result<Decimal, MoneyError> {
        parse_amount(&self.price)
    }

    /// Unit price multiplied by quantity.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing. A price that does
    /// not parse counts as zero.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price().map_or(Decimal::ZERO, |price| {
            price
                .checked_mul(Decimal::from(self.quantity))
                .unwrap_or(Decimal::MAX)
        })
    }

    /// Variant title worth showing, or `None` for single-variant products.
    #[must_use]
    pub fn display_variant_title(&self) -> Option<&str> {
        if self.variant_title.is_empty() || self.variant_title == DEFAULT_VARIANT_TITLE {
            None
        } else {
            Some(&self.variant_title)
        }
    }

    /// The `{variantId, quantity}` pair submitted at checkout.
    #[must_use]
    pub fn checkout_line(&self) -> CheckoutLine {
        CheckoutLine {
            variant_id: self.variant_id.clone(),
            quantity: self.quantity,
        }
    }
}

/// A line submitted to the Checkout Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub variant_id: VariantId,
    pub quantity: u32,
}
