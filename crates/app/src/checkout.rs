//! Checkout
//!
//! Submits the cart to the order service with a timeout, clearing it only
//! once the order has been acknowledged. At most one submission may be in
//! flight per [`Checkout`].

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{error, info};

use trolley::{
    pricing::PricingError,
    storage::SnapshotStorage,
    store::{CartStore, StoreError},
};

use crate::orders::{CheckoutRequest, OrderAcknowledgement, OrderError, OrderService};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// Another checkout is still waiting for its acknowledgement.
    #[error("a checkout is already in progress")]
    InProgress,

    /// The order service did not answer in time.
    #[error("checkout timed out after {0:?}")]
    TimedOut(Duration),

    /// The order service failed or refused the order.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The cart's estimate could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The order was placed but the emptied cart could not be saved.
    #[error("order placed but the cart could not be cleared")]
    Store(#[from] StoreError),
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Message returned by the order service.
    pub message: String,

    /// Authoritative total from the order service, if it reported one.
    pub total: Option<Money<'static, Currency>>,

    /// Client-side subtotal at the time of submission.
    pub estimate: Money<'static, Currency>,
}

/// Checkout coordinator.
pub struct Checkout {
    orders: Arc<dyn OrderService>,
    timeout: Duration,
    in_flight: AtomicBool,
}

impl fmt::Debug for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("timeout", &self.timeout)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Checkout {
    /// Create a coordinator that gives up on the order service after `timeout`.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderService>, timeout: Duration) -> Self {
        Self {
            orders,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently waiting for the order service.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `request` to the order service.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without contacting the service when
    /// the request has no lines, [`CheckoutError::InProgress`] while another
    /// submission is pending, [`CheckoutError::TimedOut`] if the service does
    /// not answer in time, or the service's own [`OrderError`].
    pub async fn submit(
        &self,
        request: &CheckoutRequest,
    ) -> Result<OrderAcknowledgement, CheckoutError> {
        if request.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CheckoutError::InProgress);
        }

        let _guard = InFlightGuard(&self.in_flight);

        tokio::time::timeout(self.timeout, self.orders.place_order(request))
            .await
            .map_err(|_elapsed| CheckoutError::TimedOut(self.timeout))?
            .map_err(CheckoutError::from)
    }

    /// Submit the store's cart and clear it once the order is acknowledged.
    ///
    /// The cart is left untouched on any failure.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit`]. Also returns [`CheckoutError::Store`] when the
    /// order succeeded but the cleared cart could not be persisted.
    pub async fn checkout<S: SnapshotStorage>(
        &self,
        store: &mut CartStore<S>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let estimate = store.cart().subtotal()?;
        let request = CheckoutRequest {
            items: store.order_lines(),
        };

        let acknowledgement = match self.submit(&request).await {
            Ok(acknowledgement) => acknowledgement,
            Err(source) => {
                error!(%source, lines = request.items.len(), "checkout failed");
                return Err(source);
            }
        };

        info!(
            total = ?acknowledgement.total,
            estimate = %estimate,
            "order acknowledged"
        );

        if let Err(source) = store.clear_cart() {
            error!(%source, "order placed but the cart could not be cleared");
            return Err(source.into());
        }

        Ok(CheckoutReceipt {
            message: acknowledgement.message,
            total: acknowledgement.total,
            estimate,
        })
    }
}
