//! Atelier CLI - shop the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! atelier catalog products --first 12
//! atelier catalog product linen-shirt
//!
//! # Manage the cart (persisted in $ATELIER_CART_DIR)
//! atelier cart add --handle linen-shirt
//! atelier cart update --variant gid://shopify/ProductVariant/11 --quantity 3
//! atelier cart show
//!
//! # Hand the cart off to Shopify checkout
//! atelier checkout
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the persisted cart
//! - `catalog` - Read products, collections and merchant content
//! - `checkout` - Create a hosted checkout and print its URL

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use atelier_storefront::{StorefrontClient, StorefrontConfig, telemetry};
use clap::{Parser, Subcommand};

mod commands;

use commands::{CliError, storefront_client};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Read catalog and merchant content
    Catalog {
        #[command(subcommand)]
        query: CatalogQuery,
    },
    /// Create a checkout for the cart and print the URL to complete payment
    Checkout {
        /// Empty the cart once the checkout URL is obtained
        #[arg(long)]
        clear_on_redirect: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents, item count and subtotal
    Show,
    /// Add one unit of a product variant
    Add {
        /// Product handle
        #[arg(long)]
        handle: String,

        /// Variant ID (defaults to the product's first variant)
        #[arg(long)]
        variant: Option<String>,
    },
    /// Remove a line from the cart
    Remove {
        /// Variant ID
        #[arg(long)]
        variant: String,
    },
    /// Set the quantity of a line (zero or less removes it)
    Update {
        /// Variant ID
        #[arg(long)]
        variant: String,

        /// New quantity
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
    /// Mark the cart panel open
    Open,
    /// Mark the cart panel closed
    Close,
    /// Flip the cart panel open state
    Toggle,
}

#[derive(Subcommand)]
enum CatalogQuery {
    /// List products
    Products {
        /// Number of products
        #[arg(long, default_value_t = atelier_storefront::shopify::DEFAULT_PRODUCT_COUNT)]
        first: i64,
    },
    /// Show one product
    Product {
        /// Product handle
        handle: String,
    },
    /// Show a collection and its products
    Collection {
        /// Collection handle
        handle: String,
    },
    /// List promotional images for a placement
    Promos {
        /// Placement slot
        #[arg(long, default_value = atelier_storefront::shopify::DEFAULT_PROMO_PLACEMENT)]
        placement: String,
    },
    /// Print announcement texts
    Discounts,
    /// Print shipping information
    Shipping,
    /// Print the header logo placement
    Logo,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so Sentry flushes on exit
    let _telemetry = telemetry::init(&config);

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            tracing::error!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Cart { action } => {
            let mut cart = commands::cart::open(config);
            match action {
                CartAction::Show => {}
                CartAction::Add { handle, variant } => {
                    let client = storefront_client(config)?;
                    commands::cart::add(&mut cart, &client, &handle, variant.as_deref()).await?;
                }
                CartAction::Remove { variant } => commands::cart::remove(&mut cart, &variant),
                CartAction::Update { variant, quantity } => {
                    commands::cart::update(&mut cart, &variant, quantity);
                }
                CartAction::Clear => cart.clear_cart(),
                CartAction::Open => cart.open_cart(),
                CartAction::Close => cart.close_cart(),
                CartAction::Toggle => cart.toggle_cart(),
            }
            commands::cart::render(cart.state(), &mut out)?;
        }
        Commands::Catalog { query } => {
            let client = storefront_client(config)?;
            render_catalog(&client, query, config, &mut out).await?;
        }
        Commands::Checkout { clear_on_redirect } => {
            let client = storefront_client(config)?;
            let mut cart = commands::cart::open(config);
            commands::checkout::run(&mut cart, &client, clear_on_redirect, &mut out).await?;
        }
    }

    Ok(())
}

async fn render_catalog(
    client: &StorefrontClient,
    query: CatalogQuery,
    config: &StorefrontConfig,
    out: &mut impl std::io::Write,
) -> Result<(), CliError> {
    match query {
        CatalogQuery::Products { first } => {
            let products = client.get_products(first).await?;
            commands::catalog::render_products(&products, out)?;
        }
        CatalogQuery::Product { handle } => {
            let product = client.get_product_by_handle(&handle).await?;
            commands::catalog::render_product(&product, out)?;
        }
        CatalogQuery::Collection { handle } => {
            let collection = client.get_collection_by_handle(&handle).await?;
            commands::catalog::render_collection(&collection, out)?;
        }
        CatalogQuery::Promos { placement } => {
            let promos = client.get_promo_images(&placement).await?;
            commands::catalog::render_promos(&promos, out)?;
        }
        CatalogQuery::Discounts => {
            let texts = client
                .get_discount_texts(&config.default_announcement)
                .await;
            commands::catalog::render_lines(&texts, out)?;
        }
        CatalogQuery::Shipping => {
            let details = client.get_shipping_details().await?;
            commands::catalog::render_shipping(&details, out)?;
        }
        CatalogQuery::Logo => {
            let placement = client.get_logo_placement().await;
            commands::catalog::render_lines(&[placement], out)?;
        }
    }

    Ok(())
}
