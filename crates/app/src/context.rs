//! App Context

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::{
    catalog::{CatalogService, HttpCatalogClient},
    checkout::Checkout,
    config::ApiConfig,
    orders::{HttpOrderClient, OrderService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrderService>,
}

impl AppContext {
    /// Build the HTTP-backed services for the configured API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn from_api_config(config: &ApiConfig) -> Result<Self, AppInitError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(AppInitError::HttpClient)?;

        Ok(Self {
            catalog: Arc::new(HttpCatalogClient::new(
                config.api_base_url.clone(),
                config.currency,
                http.clone(),
            )),
            orders: Arc::new(HttpOrderClient::new(
                config.api_base_url.clone(),
                config.currency,
                http,
            )),
        })
    }

    /// A checkout coordinator over this context's order service.
    #[must_use]
    pub fn checkout(&self, config: &ApiConfig) -> Checkout {
        Checkout::new(Arc::clone(&self.orders), config.request_timeout())
    }
}
