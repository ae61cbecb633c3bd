//! Cart

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    pricing::{PricingError, subtotal},
    products::{Product, ProductId},
};

mod line;

pub use line::{CartLine, OrderLine};

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Two lines share a product id.
    #[error("Product {0} appears on more than one line")]
    DuplicateLine(ProductId),

    /// A product is priced in another currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    ForeignProduct(ProductId, &'static str, &'static str),

    /// A product has a price below zero.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Cart
///
/// An ordered list of lines holding at most one line per product id. The most
/// recently added product comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines, in display order.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a line has the wrong currency or if a product
    /// id appears twice.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.price().currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if lines.iter().take(i).any(|earlier| earlier.id() == line.id()) {
                return Err(CartError::DuplicateLine(line.id()));
            }

            Ok(())
        })?;

        Ok(Cart { lines, currency })
    }

    /// Add one unit of `product`.
    ///
    /// An existing line for the same id has its quantity incremented and keeps
    /// its position; otherwise a new line with quantity one is inserted at the
    /// front.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the product is priced in another currency or
    /// below zero; the cart is then unchanged.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::ForeignProduct(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(product.id));
        }

        if let Some(line) = self.get_mut(product.id) {
            line.increment();

            debug!(product = %product.id, quantity = line.quantity().get(), "incremented cart line");

            return Ok(());
        }

        self.lines
            .insert(0, CartLine::new(product.clone(), NonZeroU32::MIN));

        debug!(product = %product.id, "added cart line");

        Ok(())
    }

    /// Set the quantity of the line for `id` to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Unknown ids are ignored.
    /// Returns whether a line was changed.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }

        let quantity = u32::try_from(quantity)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);

        let Some(line) = self.get_mut(id) else {
            return false;
        };

        line.set_quantity(quantity);

        debug!(product = %id, quantity = quantity.get(), "set cart line quantity");

        true
    }

    /// Remove the line for `id`, returning whether there was one.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        let removed = self.lines.len() != before;

        if removed {
            debug!(product = %id, "removed cart line");
        }

        removed
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line for `id`.
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == id)
    }

    /// Iterate over the lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// The lines as a slice, in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The id and quantity of every line, in display order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().map(OrderLine::from).collect()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Calculate the subtotal of the cart, recomputed from the lines on every call.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        subtotal(&self.lines, self.currency)
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    fn product(id: u64, minor: i64) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_minor(minor, USD))
    }

    fn ids(cart: &Cart) -> Vec<u64> {
        cart.iter().map(|line| line.id().get()).collect()
    }

    fn quantities(cart: &Cart) -> Vec<u32> {
        cart.iter().map(|line| line.quantity().get()).collect()
    }

    #[test]
    fn new_with_currency() {
        let cart = Cart::new(GBP);

        assert_eq!(cart.currency(), GBP);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_new_product_inserts_at_front() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add(&product(1, 1000))?;
        cart.add(&product(2, 500))?;

        assert_eq!(ids(&cart), vec![2, 1]);
        assert_eq!(quantities(&cart), vec![1, 1]);

        Ok(())
    }

    #[test]
    fn add_existing_product_increments_in_place() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add(&product(1, 1000))?;
        cart.add(&product(2, 500))?;
        cart.add(&product(1, 1000))?;

        assert_eq!(ids(&cart), vec![2, 1]);
        assert_eq!(quantities(&cart), vec![1, 2]);
        assert_eq!(cart.subtotal()?, Money::from_minor(2500, USD));

        Ok(())
    }

    #[test]
    fn add_keeps_the_first_cached_price() -> TestResult {
        let mut cart = Cart::new(USD);

        cart.add(&product(1, 1000))?;
        cart.add(&product(1, 1200))?;

        let line = cart.get(ProductId::new(1));

        assert_eq!(
            line.map(|line| line.price().to_minor_units()),
            Some(1000)
        );

        Ok(())
    }

    #[test]
    fn update_quantity_sets_absolute_value() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;

        assert!(cart.update_quantity(ProductId::new(1), 5));
        assert_eq!(quantities(&cart), vec![5]);

        assert!(cart.update_quantity(ProductId::new(1), 2));
        assert_eq!(quantities(&cart), vec![2]);

        Ok(())
    }

    #[test]
    fn update_quantity_zero_or_negative_removes() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;
        cart.add(&product(2, 1000))?;

        assert!(cart.update_quantity(ProductId::new(1), 0));
        assert!(cart.update_quantity(ProductId::new(2), -3));

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_id_is_noop() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;
        let before = cart.clone();

        assert!(!cart.update_quantity(ProductId::new(9), 4));
        assert!(!cart.update_quantity(ProductId::new(9), 0));

        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn update_quantity_clamps_huge_values() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1))?;

        cart.update_quantity(ProductId::new(1), i64::MAX);

        assert_eq!(quantities(&cart), vec![u32::MAX]);

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;

        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn derived_counts() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;
        cart.add(&product(1, 1000))?;
        cart.add(&product(2, 250))?;

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_item_count(), 3);

        Ok(())
    }

    #[test]
    fn order_lines_follow_display_order() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;
        cart.add(&product(2, 250))?;
        cart.update_quantity(ProductId::new(1), 4);

        assert_eq!(
            cart.order_lines(),
            vec![
                OrderLine {
                    id: ProductId::new(2),
                    quantity: 1
                },
                OrderLine {
                    id: ProductId::new(1),
                    quantity: 4
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn with_lines_currency_mismatch_errors() {
        let lines = [
            CartLine::new(product(1, 100), NonZeroU32::MIN),
            CartLine::new(
                Product::new(2, "Tea", Money::from_minor(100, GBP)),
                NonZeroU32::MIN,
            ),
        ];

        let result = Cart::with_lines(lines, USD);

        assert_eq!(
            result,
            Err(CartError::CurrencyMismatch(
                1,
                GBP.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
    }

    #[test]
    fn add_rejects_foreign_currency() -> TestResult {
        let mut cart = Cart::new(USD);
        cart.add(&product(1, 1000))?;
        let before = cart.clone();

        let result = cart.add(&Product::new(2, "Tea", Money::from_minor(300, GBP)));

        assert_eq!(
            result,
            Err(CartError::ForeignProduct(
                ProductId::new(2),
                GBP.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
        assert_eq!(cart, before);
        assert_eq!(cart.subtotal()?, Money::from_minor(1000, USD));

        Ok(())
    }

    #[test]
    fn add_rejects_negative_price() {
        let mut cart = Cart::new(USD);

        assert_eq!(
            cart.add(&product(3, -100)),
            Err(CartError::NegativePrice(ProductId::new(3)))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn with_lines_duplicate_id_errors() {
        let lines = [
            CartLine::new(product(1, 100), NonZeroU32::MIN),
            CartLine::new(product(1, 100), NonZeroU32::MIN),
        ];

        assert_eq!(
            Cart::with_lines(lines, USD),
            Err(CartError::DuplicateLine(ProductId::new(1)))
        );
    }

    #[test]
    fn subtotal_with_no_lines() -> TestResult {
        let cart = Cart::new(GBP);

        assert_eq!(cart.subtotal()?, Money::from_minor(0, GBP));

        Ok(())
    }
}
