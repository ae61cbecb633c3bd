//! Receipt
//!
//! Terminal rendering of a cart. Totals are computed in minor units and only
//! formatted to two decimal places here.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, pricing::PricingError};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line or the subtotal could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the output failed.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Write the cart as a table followed by its item count and estimated subtotal.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if a total cannot be computed or the output
/// cannot be written.
pub fn write_cart_to(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "No items in cart.")?;
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Qty", "Price", "Total"]);

    for (idx, line) in cart.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.product().name.clone(),
            line.quantity().to_string(),
            format!("{}", line.price()),
            format!("{}", line.line_total()?),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "Items: {}  Lines: {}  Subtotal (estimate): {}",
        cart.total_item_count(),
        cart.line_count(),
        cart.subtotal()?
    )?;

    Ok(())
}
