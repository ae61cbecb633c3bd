//! Pricing
//!
//! All arithmetic happens on integer minor units. Conversions to and from
//! [`Decimal`] major units only happen at the catalog, snapshot and display
//! boundaries.

use std::num::NonZeroU32;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while converting or totalling prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A price was negative or could not be represented in minor units.
    #[error("invalid price amount: {0}")]
    InvalidAmount(Decimal),

    /// The currency code is not one this crate prices in.
    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    /// A line total overflowed the minor unit range.
    #[error("price overflow while multiplying {0} minor units by {1}")]
    Overflow(i64, u32),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Resolve an ISO currency code.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] for anything other than `GBP`,
/// `USD` or `EUR`.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PricingError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(PricingError::UnknownCurrency(code.to_string())),
    }
}

/// Convert a major unit amount (e.g. `29.99`) into money.
///
/// Amounts with more than two decimal places are rounded to the nearest cent.
///
/// # Errors
///
/// Returns [`PricingError::InvalidAmount`] when the amount is negative or out
/// of range.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::InvalidAmount(amount));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(PricingError::InvalidAmount(amount))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Convert money back into a major unit amount with two decimal places.
pub fn money_to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), 2)
}

/// Price of `quantity` units at `price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total(
    price: &Money<'static, Currency>,
    quantity: NonZeroU32,
) -> Result<Money<'static, Currency>, PricingError> {
    let minor_units = price.to_minor_units();

    let total = minor_units
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow(minor_units, quantity.get()))?;

    Ok(Money::from_minor(total, price.currency()))
}

/// Sum of `price * quantity` over the given lines.
///
/// An empty set of lines totals zero in `currency`.
///
/// # Errors
///
/// Returns a [`PricingError`] on overflow or if a line is priced in a
/// different currency.
pub fn subtotal<'l>(
    lines: impl IntoIterator<Item = &'l CartLine>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line.line_total()?)?)
        })
}
