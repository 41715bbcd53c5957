//! Cart commands.
//!
//! Every invocation rehydrates the cart from its JSON file; mutations are
//! written back by the store itself.

use std::io::{self, Write};

use atelier_core::cart::{CartState, CartStore};
use atelier_core::types::{VariantId, format_amount};
use atelier_storefront::error::add_breadcrumb;
use atelier_storefront::{JsonFileStorage, StorefrontClient, StorefrontConfig};
use tracing::info;

use super::CliError;

/// Load the persisted cart.
pub fn open(config: &StorefrontConfig) -> CartStore<JsonFileStorage> {
    CartStore::rehydrate(JsonFileStorage::from_config(&config.cart))
}

/// Look up a product and add one unit of the chosen variant.
pub async fn add(
    cart: &mut CartStore<JsonFileStorage>,
    client: &StorefrontClient,
    handle: &str,
    variant: Option<&str>,
) -> Result<(), CliError> {
    let product = client.get_product_by_handle(handle).await?;
    let variant_id = variant.map(VariantId::new);
    let candidate = product.to_cart_candidate(variant_id.as_ref())?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("variant_id", candidate.variant_id.as_str())]),
    );
    info!(variant_id = %candidate.variant_id, "Adding to cart");
    cart.add_item(candidate);
    Ok(())
}

pub fn remove(cart: &mut CartStore<JsonFileStorage>, variant: &str) {
    add_breadcrumb("cart", "Removed item", Some(&[("variant_id", variant)]));
    cart.remove_item(&VariantId::new(variant));
}

pub fn update(cart: &mut CartStore<JsonFileStorage>, variant: &str, quantity: i64) {
    add_breadcrumb("cart", "Updated quantity", Some(&[("variant_id", variant)]));
    cart.update_quantity(&VariantId::new(variant), quantity);
}

/// Print cart lines, item count and subtotal.
pub fn render(state: &CartState, out: &mut impl Write) -> io::Result<()> {
    if state.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    for item in state.items() {
        let name = match item.display_variant_title() {
            Some(variant) => format!("{} - {variant}", item.title),
            None => item.title.clone(),
        };
        writeln!(
            out,
            "{:>3} x {name}  @ {} {}  = {} {}",
            item.quantity,
            item.unit_price().map_or_else(|_| item.price.clone(), format_amount),
            item.currency_code,
            format_amount(item.line_total()),
            item.currency_code,
        )?;
        writeln!(out, "        {}", item.variant_id)?;
    }

    writeln!(out, "Items: {}", state.item_count())?;
    match state.currency_code() {
        Ok(Some(currency)) => {
            writeln!(out, "Subtotal: {} {currency}", format_amount(state.subtotal()))?;
        }
        Ok(None) => {}
        Err(e) => writeln!(out, "Subtotal: unavailable ({e})")?,
    }
    writeln!(
        out,
        "Cart is {}",
        if state.is_open() { "open" } else { "closed" }
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::cart::{MemoryStorage, NewCartLineItem};
    use atelier_core::types::ProductId;

    use super::*;

    fn candidate(variant: &str, variant_title: &str, price: &str, currency: &str) -> NewCartLineItem {
        NewCartLineItem {
            variant_id: VariantId::new(variant),
            product_id: ProductId::new("gid://shopify/Product/1"),
            title: "Linen Shirt".to_string(),
            variant_title: variant_title.to_string(),
            price: price.to_string(),
            currency_code: currency.to_string(),
            image: String::new(),
            handle: "linen-shirt".to_string(),
        }
    }

    fn rendered(cart: &CartStore<MemoryStorage>) -> String {
        let mut out = Vec::new();
        render(cart.state(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_empty() {
        let cart = CartStore::new(MemoryStorage::new());
        assert_eq!(rendered(&cart), "Your cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_subtotal() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(candidate("a", "M", "19.99", "ILS"));
        cart.add_item(candidate("a", "M", "19.99", "ILS"));
        cart.add_item(candidate("b", "Default Title", "5", "ILS"));

        let text = rendered(&cart);
        assert!(text.contains("  2 x Linen Shirt - M  @ 19.99 ILS  = 39.98 ILS\n"));
        assert!(text.contains("  1 x Linen Shirt  @ 5.00 ILS  = 5.00 ILS\n"));
        assert!(text.contains("Items: 3\n"));
        assert!(text.contains("Subtotal: 44.98 ILS\n"));
        assert!(text.ends_with("Cart is closed\n"));
    }

    #[test]
    fn test_render_mixed_currency_has_no_total() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(candidate("a", "M", "10", "ILS"));
        cart.add_item(candidate("b", "M", "10", "USD"));
        cart.open_cart();

        let text = rendered(&cart);
        assert!(text.contains("Subtotal: unavailable (cart mixes currencies: ILS and USD)\n"));
        assert!(text.ends_with("Cart is open\n"));
    }

    #[test]
    fn test_render_keeps_unparseable_price_verbatim() {
        let mut cart = CartStore::new(MemoryStorage::new());
        cart.add_item(candidate("a", "M", "call us", "ILS"));
        cart.add_item(candidate("b", "M", "1e1", "ILS"));

        let text = rendered(&cart);
        assert!(text.contains("  1 x Linen Shirt - M  @ call us ILS  = 0.00 ILS\n"));
        assert!(text.contains("  1 x Linen Shirt - M  @ 10.00 ILS  = 10.00 ILS\n"));
        assert!(text.contains("Subtotal: 10.00 ILS\n"));
    }
}
