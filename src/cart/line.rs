//! Cart lines

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::{
    pricing::{PricingError, line_total},
    products::{Product, ProductId},
};

/// One entry in a cart: a cached copy of a product plus a quantity of at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: NonZeroU32,
}

impl CartLine {
    /// Creates a new line for `product`.
    #[must_use]
    pub fn new(product: Product, quantity: NonZeroU32) -> Self {
        Self { product, quantity }
    }

    /// Returns the id of the product on this line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Returns the product as it was when added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the unit price.
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.product.price
    }

    /// Returns the quantity.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Returns `price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(&self.product.price, self.quantity)
    }

    pub(crate) fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    pub(crate) fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }
}

/// A cart line stripped down to what an order needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Product id
    pub id: ProductId,

    /// Quantity ordered
    pub quantity: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id(),
            quantity: line.quantity().get(),
        }
    }
}
