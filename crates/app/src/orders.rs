//! Order client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use trolley::{cart::OrderLine, pricing::money_from_decimal};

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The order endpoint returned a non-2xx status without a message.
    #[error("checkout request failed with status {0}")]
    Status(u16),

    /// The server refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Body sent to the checkout endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    /// Ordered `{id, quantity}` pairs.
    pub items: Vec<OrderLine>,
}

impl CheckoutRequest {
    /// Whether the request has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Successful acknowledgement from the order service.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAcknowledgement {
    /// Message returned by the server, empty if it sent none.
    pub message: String,

    /// Authoritative total computed by the server, when it reported a usable one.
    pub total: Option<Money<'static, Currency>>,
}

/// Places orders with the backend.
#[automock]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit an order and wait for its acknowledgement.
    async fn place_order(
        &self,
        request: &CheckoutRequest,
    ) -> Result<OrderAcknowledgement, OrderError>;
}

#[derive(Debug, Default, Deserialize)]
struct CheckoutResponse {
    #[serde(default)]
    success: Option<bool>,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    total: Option<serde_json::Value>,
}

/// Interpret a checkout response with the given HTTP status.
///
/// Any 2xx response acknowledges the order unless its body explicitly says
/// `"success": false`. A missing or unusable total is reported as `None`.
///
/// # Errors
///
/// Returns [`OrderError::Rejected`] when the server reports a failure with a
/// message and [`OrderError::Status`] for a non-2xx response without one.
pub fn decode_order_response(
    status: StatusCode,
    body: &str,
    currency: &'static Currency,
) -> Result<OrderAcknowledgement, OrderError> {
    let parsed = serde_json::from_str::<CheckoutResponse>(body);

    if !status.is_success() {
        return match parsed {
            Ok(CheckoutResponse {
                message: Some(message),
                ..
            }) => Err(OrderError::Rejected(message)),
            _ => Err(OrderError::Status(status.as_u16())),
        };
    }

    let response = parsed.unwrap_or_else(|error| {
        warn!(%error, "checkout acknowledged with an unreadable body");
        CheckoutResponse::default()
    });

    if response.success == Some(false) {
        return Err(OrderError::Rejected(
            response
                .message
                .unwrap_or_else(|| "order was not accepted".to_string()),
        ));
    }

    let total = response.total.and_then(|raw| {
        serde_json::from_value::<Decimal>(raw)
            .ok()
            .and_then(|amount| money_from_decimal(amount, currency).ok())
            .or_else(|| {
                warn!("checkout acknowledged without a usable total");
                None
            })
    });

    Ok(OrderAcknowledgement {
        message: response.message.unwrap_or_default(),
        total,
    })
}

/// HTTP client for the checkout endpoint.
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    base_url: String,
    currency: &'static Currency,
    http: Client,
}

impl HttpOrderClient {
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
impl OrderService for HttpOrderClient {
    async fn place_order(
        &self,
        request: &CheckoutRequest,
    ) -> Result<OrderAcknowledgement, OrderError> {
        let url = format!("{}/checkout", self.base_url.trim_end_matches('/'));

        debug!(%url, lines = request.items.len(), "submitting order");

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_order_response(status, &body, self.currency)
    }
}
