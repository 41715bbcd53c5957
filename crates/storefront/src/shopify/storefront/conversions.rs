//! Conversions from raw GraphQL responses to domain types.

use std::collections::BTreeMap;

use atelier_core::types::{CollectionId, ProductId, VariantId};

use crate::shopify::types::{
    CheckoutRedirect, CheckoutUserError, Collection, Image, Metafield, Metaobject,
    MetaobjectField, Money, Product, ProductVariant, PromoImage, PromoTone,
};
use crate::shopify::ShopifyError;

use super::queries::{create_checkout_cart, get_collection_by_handle, get_metaobjects, shared};

// =============================================================================
// Catalog Conversions
// =============================================================================

fn convert_image(image: shared::Image) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

fn convert_variant(variant: shared::ProductVariant) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title,
        price: Money {
            amount: variant.price.amount,
            currency_code: variant.price.currency_code,
        },
        available_for_sale: variant.available_for_sale,
    }
}

pub fn convert_product(product: shared::Product) -> Product {
    Product {
        id: ProductId::new(product.id),
        title: product.title,
        description: product.description,
        description_html: product.description_html,
        handle: product.handle,
        product_type: product.product_type,
        images: product.images.into_nodes().map(convert_image).collect(),
        variants: product.variants.into_nodes().map(convert_variant).collect(),
        metafields: product
            .metafields
            .into_iter()
            .flatten()
            .map(|m| Metafield {
                namespace: m.namespace,
                key: m.key,
                value: m.value,
            })
            .collect(),
    }
}

pub fn convert_collection(collection: get_collection_by_handle::Collection) -> Collection {
    Collection {
        id: CollectionId::new(collection.id),
        title: collection.title,
        handle: collection.handle,
        products: collection
            .products
            .into_nodes()
            .map(convert_product)
            .collect(),
    }
}

// =============================================================================
// Metaobject Conversions
// =============================================================================

pub fn convert_metaobject(metaobject: get_metaobjects::Metaobject) -> Metaobject {
    Metaobject {
        id: metaobject.id,
        fields: metaobject
            .fields
            .into_iter()
            .map(|f| MetaobjectField {
                key: f.key,
                value: f.value,
                image: f.reference.and_then(|r| r.image).map(convert_image),
            })
            .collect(),
    }
}

/// Turn a `promo_image` metaobject into a banner, dropping entries without a
/// resolved image.
pub fn promo_image_from_metaobject(metaobject: &Metaobject) -> Option<PromoImage> {
    let image = metaobject.field("image")?.image.clone()?;

    Some(PromoImage {
        id: metaobject.id.clone(),
        placement: metaobject.value("placement").unwrap_or_default().to_string(),
        image,
        title: metaobject.value("title").unwrap_or_default().to_string(),
        tone: PromoTone::from_field(metaobject.value("bright")),
    })
}

/// Text of the first leaf of a rich text document
/// (`root > paragraph > text`).
///
/// Values that are not rich text JSON are returned unchanged.
pub fn first_rich_text_leaf(raw: &str) -> Option<String> {
    let Ok(document) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Some(raw.to_string());
    };

    document
        .get("children")
        .and_then(|c| c.get(0))
        .and_then(|p| p.get("children"))
        .and_then(|c| c.get(0))
        .and_then(|t| t.get("value"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Flatten a rich text document into plain text by concatenating every text
/// node in document order.
///
/// Values that are not a rich text `root` document are returned unchanged.
pub fn flatten_rich_text(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(document)
            if document.get("type").and_then(serde_json::Value::as_str) == Some("root")
                && document.get("children").is_some() =>
        {
            let mut out = String::new();
            collect_text(&document, &mut out);
            out
        }
        _ => raw.to_string(),
    }
}

fn collect_text(node: &serde_json::Value, out: &mut String) {
    if node.get("type").and_then(serde_json::Value::as_str) == Some("text") {
        if let Some(value) = node.get("value").and_then(serde_json::Value::as_str) {
            out.push_str(value);
        }
        return;
    }

    if let Some(children) = node.get("children").and_then(serde_json::Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}

/// Announcement lines from `discount` metaobjects, in publish order.
///
/// Entries without a usable `description` are skipped.
pub fn discount_texts(metaobjects: &[Metaobject]) -> Vec<String> {
    metaobjects
        .iter()
        .filter_map(|m| m.value("description"))
        .filter(|raw| !raw.is_empty())
        .filter_map(first_rich_text_leaf)
        .collect()
}

/// Field maps of `shipping_details` metaobjects with `description`
/// flattened to plain text.
pub fn shipping_details(metaobjects: &[Metaobject]) -> Vec<BTreeMap<String, String>> {
    metaobjects
        .iter()
        .map(|m| {
            let mut fields = m.to_map();
            if let Some(description) = fields.get_mut("description") {
                *description = flatten_rich_text(description);
            }
            fields
        })
        .collect()
}

// =============================================================================
// Checkout Conversions
// =============================================================================

pub fn convert_checkout_user_error(
    error: create_checkout_cart::CartUserError,
) -> CheckoutUserError {
    CheckoutUserError {
        field: error.field.unwrap_or_default(),
        message: error.message,
    }
}

/// Interpret a `cartCreate` payload.
///
/// User errors win over a partially created cart; the first message is the
/// one shown to the shopper.
pub fn convert_checkout_payload(
    payload: Option<create_checkout_cart::CartCreatePayload>,
) -> Result<CheckoutRedirect, ShopifyError> {
    let payload = payload.ok_or_else(|| {
        ShopifyError::GraphQL(vec![crate::shopify::GraphQLError::message(
            "cartCreate returned no payload",
        )])
    })?;

    if let Some(first) = payload
        .user_errors
        .into_iter()
        .map(convert_checkout_user_error)
        .next()
    {
        return Err(ShopifyError::UserError(first.message));
    }

    let cart = payload.cart.ok_or_else(|| {
        ShopifyError::GraphQL(vec![crate::shopify::GraphQLError::message(
            "cartCreate returned no cart",
        )])
    })?;

    Ok(CheckoutRedirect {
        checkout_url: url::Url::parse(&cart.checkout_url)?,
        cart_id: cart.id,
    })
}
