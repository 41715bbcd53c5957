//! Catalog and merchant content commands.

use std::collections::BTreeMap;
use std::io::{self, Write};

use atelier_storefront::shopify::{Collection, Product, PromoImage, PromoTone};

fn product_summary(product: &Product, out: &mut impl Write) -> io::Result<()> {
    let price = product
        .variants
        .first()
        .map(|v| format!("{} {}", v.price.amount, v.price.currency_code))
        .unwrap_or_default();
    let availability = if product.is_available() {
        ""
    } else {
        "  (sold out)"
    };
    writeln!(out, "{:<32} {price}{availability}", product.handle)
}

pub fn render_products(products: &[Product], out: &mut impl Write) -> io::Result<()> {
    for product in products {
        product_summary(product, out)?;
    }
    Ok(())
}

pub fn render_product(product: &Product, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", product.title)?;
    if !product.product_type.is_empty() {
        writeln!(out, "Type: {}", product.product_type)?;
    }
    if let Some(color) = product.color() {
        writeln!(out, "Color: {color}")?;
    }
    if let Some(image) = product.featured_image() {
        writeln!(out, "Image: {}", image.url)?;
    }
    if !product.description.is_empty() {
        writeln!(out, "\n{}\n", product.description)?;
    }

    writeln!(out, "Variants:")?;
    for variant in &product.variants {
        writeln!(
            out,
            "  {} {} {}{}  [{}]",
            variant.title,
            variant.price.amount,
            variant.price.currency_code,
            if variant.available_for_sale {
                ""
            } else {
                " (sold out)"
            },
            variant.id
        )?;
    }
    Ok(())
}

pub fn render_collection(collection: &Collection, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{} ({} products)", collection.title, collection.products.len())?;
    render_products(&collection.products, out)
}

pub fn render_promos(promos: &[PromoImage], out: &mut impl Write) -> io::Result<()> {
    for promo in promos {
        let tone = match promo.tone {
            PromoTone::Bright => "bright",
            PromoTone::Dark => "dark",
        };
        writeln!(out, "{} [{tone}] {}", promo.image.url, promo.title)?;
    }
    Ok(())
}

pub fn render_shipping(
    details: &[BTreeMap<String, String>],
    out: &mut impl Write,
) -> io::Result<()> {
    for (i, fields) in details.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        for (key, value) in fields {
            writeln!(out, "{key}: {value}")?;
        }
    }
    Ok(())
}

pub fn render_lines(lines: &[String], out: &mut impl Write) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
