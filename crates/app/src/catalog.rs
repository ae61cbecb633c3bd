//! Catalog client.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use trolley::{
    pricing::{PricingError, money_from_decimal},
    products::{Product, ProductId},
};

/// Message shown when the catalog cannot be reached.
pub const UNREACHABLE_NOTICE: &str = "Could not load products. Please check the backend server.";

/// Message shown when the catalog answers with something other than a product list.
pub const MALFORMED_NOTICE: &str =
    "The product data returned by the server is corrupted or has an unexpected format.";

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog returned a non-2xx status.
    #[error("catalog request failed with status {0}")]
    Status(u16),

    /// The body was not the expected `{ products: [...] }` shape.
    #[error("unexpected catalog response: {0}")]
    Malformed(String),

    /// A product carries a price that cannot be used.
    #[error("product {0} has an invalid price")]
    InvalidPrice(ProductId, #[source] PricingError),
}

impl CatalogError {
    /// The message to show the user for this failure.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::Malformed(_) | Self::InvalidPrice(..) => MALFORMED_NOTICE,
            Self::Http(_) | Self::Status(_) => UNREACHABLE_NOTICE,
        }
    }
}

/// Reads the product catalog from the backend.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch every product, in catalog order.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: Decimal,
    #[serde(default)]
    image_url: Option<String>,
}

/// Decode a catalog response body into products priced in `currency`.
///
/// # Errors
///
/// Returns [`CatalogError::Malformed`] if the body is not JSON, has no
/// `products` list or a record is incomplete, and
/// [`CatalogError::InvalidPrice`] for negative or out of range prices.
pub fn decode_products(
    body: &str,
    currency: &'static Currency,
) -> Result<Vec<Product>, CatalogError> {
    let response: ProductsResponse =
        serde_json::from_str(body).map_err(|error| CatalogError::Malformed(error.to_string()))?;

    if !response.products.is_array() {
        return Err(CatalogError::Malformed(
            "`products` is not a list".to_string(),
        ));
    }

    let records: Vec<ProductRecord> = serde_json::from_value(response.products)
        .map_err(|error| CatalogError::Malformed(error.to_string()))?;

    records
        .into_iter()
        .map(|record| {
            let price = money_from_decimal(record.price, currency)
                .map_err(|error| CatalogError::InvalidPrice(record.id, error))?;

            Ok(Product {
                id: record.id,
                name: record.name,
                price,
                image_url: record.image_url,
            })
        })
        .collect()
}

/// HTTP client for the catalog endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    currency: &'static Currency,
    http: Client,
}

impl HttpCatalogClient {
    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, currency: &'static Currency, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            currency,
            http,
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = format!("{}/products", self.base_url.trim_end_matches('/'));

        debug!(%url, "fetching catalog");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;

        decode_products(&body, self.currency)
    }
}

/// Products to display plus an optional message explaining why there are none.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    /// Products in catalog order.
    pub products: Vec<Product>,

    /// User-visible failure notice.
    pub notice: Option<String>,
}

/// Fetch the catalog once, degrading any failure to an empty list with a notice.
pub async fn load_catalog(catalog: &Arc<dyn CatalogService>) -> CatalogView {
    match catalog.products().await {
        Ok(products) => CatalogView {
            products,
            notice: None,
        },
        Err(source) => {
            error!(%source, "failed to load catalog");

            CatalogView {
                products: Vec::new(),
                notice: Some(source.notice().to_string()),
            }
        }
    }
}
