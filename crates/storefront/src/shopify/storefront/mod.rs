//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` envelopes with `reqwest` 0.13 for HTTP.
//! Caches catalog and metaobject reads using `moka` (5-minute TTL).

mod cache;
mod conversions;
pub mod queries;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use atelier_core::cart::CheckoutLine;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::checkout::CheckoutService;
use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{
    CheckoutRedirect, Collection, DEFAULT_LOGO_PLACEMENT, Metaobject, Product, PromoImage,
};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::CacheValue;
use conversions::{
    convert_checkout_payload, convert_collection, convert_metaobject, convert_product,
    discount_texts, promo_image_from_metaobject, shipping_details,
};
use queries::{
    CreateCheckoutCart, GetCollectionByHandle, GetMetaobjects, GetProductByHandle, GetProducts,
    create_checkout_cart, get_collection_by_handle, get_metaobjects, get_product_by_handle,
    get_products,
};

/// Products shown on the shop listing.
pub const DEFAULT_PRODUCT_COUNT: i64 = 12;
/// Products fetched per collection page.
pub const COLLECTION_PRODUCT_COUNT: i64 = 20;
/// Metaobjects fetched per type.
pub const METAOBJECT_PAGE_SIZE: i64 = 20;
/// Placement slot of the home page carousel.
pub const DEFAULT_PROMO_PLACEMENT: &str = "hero-banner";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides type-safe access to products, collections, merchant content,
/// and checkout creation. Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<String, CacheValue>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token().to_string(),
                cache,
            }),
        }
    }

    /// GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                "X-Shopify-Storefront-Access-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            ))]));
        }

        let response: Response<Q::ResponseData> = serde_json::from_str(&response_text)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                ShopifyError::Parse(e)
            })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the first `first` products of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, first: i64) -> Result<Vec<Product>, ShopifyError> {
        let cache_key = cache::products_key(first);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(get_products::Variables { first })
            .await?;

        let products: Vec<Product> = data.products.into_nodes().map(convert_product).collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = cache::product_key(handle);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let data = self
            .execute::<GetProductByHandle>(get_product_by_handle::Variables {
                handle: handle.to_string(),
            })
            .await?;

        let product = data
            .product
            .map(convert_product)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection and its first products by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(&self, handle: &str) -> Result<Collection, ShopifyError> {
        let cache_key = cache::collection_key(handle, COLLECTION_PRODUCT_COUNT);

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let data = self
            .execute::<GetCollectionByHandle>(get_collection_by_handle::Variables {
                handle: handle.to_string(),
                product_count: COLLECTION_PRODUCT_COUNT,
            })
            .await?;

        let collection = data
            .collection
            .map(convert_collection)
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    // =========================================================================
    // Merchant Content (metaobjects)
    // =========================================================================

    /// Get all metaobjects of a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_metaobjects(&self, kind: &str) -> Result<Vec<Metaobject>, ShopifyError> {
        let cache_key = cache::metaobjects_key(kind, METAOBJECT_PAGE_SIZE);

        if let Some(CacheValue::Metaobjects(objects)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for metaobjects");
            return Ok(objects);
        }

        let data = self
            .execute::<GetMetaobjects>(get_metaobjects::Variables {
                kind: kind.to_string(),
                first: METAOBJECT_PAGE_SIZE,
            })
            .await?;

        let objects: Vec<Metaobject> = data
            .metaobjects
            .into_nodes()
            .map(convert_metaobject)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Metaobjects(objects.clone()))
            .await;

        Ok(objects)
    }

    /// Promotional images for a placement slot.
    ///
    /// Entries without a resolved image are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_promo_images(&self, placement: &str) -> Result<Vec<PromoImage>, ShopifyError> {
        Ok(self
            .get_metaobjects("promo_image")
            .await?
            .iter()
            .filter_map(promo_image_from_metaobject)
            .filter(|promo| promo.placement == placement)
            .collect())
    }

    /// Announcement texts from `discount` metaobjects.
    ///
    /// Never fails: when nothing is published or the request fails, the
    /// single `fallback` text is returned.
    pub async fn get_discount_texts(&self, fallback: &str) -> Vec<String> {
        match self.get_metaobjects("discount").await {
            Ok(objects) => {
                let texts = discount_texts(&objects);
                if texts.is_empty() {
                    vec![fallback.to_string()]
                } else {
                    texts
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch discounts, using fallback");
                vec![fallback.to_string()]
            }
        }
    }

    /// Fields of the first metaobject of a type, `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_metaobject(
        &self,
        kind: &str,
    ) -> Result<Option<BTreeMap<String, String>>, ShopifyError> {
        Ok(self
            .get_metaobjects(kind)
            .await?
            .first()
            .map(Metaobject::to_map))
    }

    /// Shipping information blocks, with rich text descriptions flattened.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn get_shipping_details(
        &self,
    ) -> Result<Vec<BTreeMap<String, String>>, ShopifyError> {
        Ok(shipping_details(&self.get_metaobjects("shipping_details").await?))
    }

    /// Header logo placement; `"middle"` when unset or on error.
    pub async fn get_logo_placement(&self) -> String {
        match self.get_metaobject("logo_placement").await {
            Ok(fields) => fields
                .and_then(|mut f| f.remove("placement"))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_LOGO_PLACEMENT.to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to fetch logo placement, using default");
                DEFAULT_LOGO_PLACEMENT.to_string()
            }
        }
    }

    // =========================================================================
    // Checkout (not cached)
    // =========================================================================

    /// Create a Shopify cart holding `lines` and return its checkout URL.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` with the first validation message
    /// (e.g., insufficient stock) or any transport/GraphQL error.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> Result<CheckoutRedirect, ShopifyError> {
        let variables = create_checkout_cart::Variables {
            input: create_checkout_cart::CartInput {
                lines: lines
                    .iter()
                    .map(|line| create_checkout_cart::CartLineInput {
                        merchandise_id: line.variant_id.to_string(),
                        quantity: i64::from(line.quantity),
                    })
                    .collect(),
            },
        };

        let data = self.execute::<CreateCheckoutCart>(variables).await?;
        let redirect = convert_checkout_payload(data.cart_create)?;
        debug!(cart_id = %redirect.cart_id, "Checkout cart created");
        Ok(redirect)
    }
}

impl CheckoutService for StorefrontClient {
    async fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> Result<CheckoutRedirect, ShopifyError> {
        Self::create_checkout(self, lines).await
    }
}
