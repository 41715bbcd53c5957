//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`], with its
//! variables and response shapes in a snake_case module of the same name.
//! Response types mirror the selection sets exactly and are converted to
//! domain types in `conversions`.

use graphql_client::{GraphQLQuery, QueryBody};

macro_rules! operation {
    ($name:ident, $module:ident, $operation_name:literal) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $operation_name,
                }
            }
        }
    };
}

operation!(GetProducts, get_products, "GetProducts");
operation!(GetProductByHandle, get_product_by_handle, "GetProductByHandle");
operation!(
    GetCollectionByHandle,
    get_collection_by_handle,
    "GetCollectionByHandle"
);
operation!(GetMetaobjects, get_metaobjects, "GetMetaobjects");
operation!(CreateCheckoutCart, create_checkout_cart, "CreateCheckoutCart");

/// Response shapes shared by several operations.
pub mod shared {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Connection<T> {
        pub edges: Vec<Edge<T>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge<T> {
        pub node: T,
    }

    impl<T> Connection<T> {
        pub fn into_nodes(self) -> impl Iterator<Item = T> {
            self.edges.into_iter().map(|edge| edge.node)
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Image {
        pub url: String,
        pub alt_text: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariant {
        pub id: String,
        pub title: String,
        pub price: MoneyV2,
        pub available_for_sale: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metafield {
        pub namespace: String,
        pub key: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Product {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub description_html: String,
        pub handle: String,
        #[serde(default)]
        pub product_type: String,
        pub images: Connection<Image>,
        pub variants: Connection<ProductVariant>,
        /// `metafields(identifiers:)` returns a list with `null` for unset keys.
        #[serde(default)]
        pub metafields: Vec<Option<Metafield>>,
    }
}

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use super::shared::{Connection, Product};

    pub const QUERY: &str = r#"
query GetProducts($first: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        description
        descriptionHtml
        handle
        productType
        images(first: 2) { edges { node { url altText } } }
        variants(first: 1) {
          edges { node { id title price { amount currencyCode } availableForSale } }
        }
        metafields(identifiers: [{namespace: "custom", key: "color"}]) { namespace key value }
      }
    }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<Product>,
    }
}

pub mod get_product_by_handle {
    use serde::{Deserialize, Serialize};

    use super::shared::Product;

    pub const QUERY: &str = r#"
query GetProductByHandle($handle: String!) {
  product(handle: $handle) {
    id
    title
    description
    descriptionHtml
    handle
    productType
    images(first: 5) { edges { node { url altText } } }
    variants(first: 10) {
      edges { node { id title price { amount currencyCode } availableForSale } }
    }
    metafields(identifiers: [{namespace: "custom", key: "color"}]) { namespace key value }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }
}

pub mod get_collection_by_handle {
    use serde::{Deserialize, Serialize};

    use super::shared::{Connection, Product};

    pub const QUERY: &str = r#"
query GetCollectionByHandle($handle: String!, $productCount: Int!) {
  collection(handle: $handle) {
    id
    title
    handle
    products(first: $productCount) {
      edges {
        node {
          id
          title
          description
          descriptionHtml
          handle
          productType
          images(first: 2) { edges { node { url altText } } }
          variants(first: 1) {
            edges { node { id title price { amount currencyCode } availableForSale } }
          }
          metafields(identifiers: [{namespace: "custom", key: "color"}]) { namespace key value }
        }
      }
    }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub product_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<Collection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Collection {
        pub id: String,
        pub title: String,
        pub handle: String,
        pub products: Connection<Product>,
    }
}

pub mod get_metaobjects {
    use serde::{Deserialize, Serialize};

    use super::shared::{Connection, Image};

    pub const QUERY: &str = r#"
query GetMetaobjects($type: String!, $first: Int!) {
  metaobjects(type: $type, first: $first) {
    edges {
      node {
        id
        fields {
          key
          value
          reference {
            ... on MediaImage { image { url altText } }
          }
        }
      }
    }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(rename = "type")]
        pub kind: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub metaobjects: Connection<Metaobject>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metaobject {
        pub id: String,
        pub fields: Vec<MetaobjectField>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectField {
        pub key: String,
        pub value: Option<String>,
        #[serde(default)]
        pub reference: Option<Reference>,
    }

    /// Non-image references come back as an empty object.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Reference {
        #[serde(default)]
        pub image: Option<Image>,
    }
}

pub mod create_checkout_cart {
    use serde::{Deserialize, Serialize};

    pub const QUERY: &str = r#"
mutation CreateCheckoutCart($input: CartInput!) {
  cartCreate(input: $input) {
    cart { id checkoutUrl }
    userErrors { field message }
  }
}
"#;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineInput {
        pub merchandise_id: String,
        pub quantity: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartCreatePayload {
        pub cart: Option<Cart>,
        pub user_errors: Vec<CartUserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Cart {
        pub id: String,
        pub checkout_url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartUserError {
        pub field: Option<Vec<String>>,
        pub message: String,
    }
}
