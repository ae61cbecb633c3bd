//! Snapshots
//!
//! JSON encoding of the cart and the liked set as written to storage. The
//! cart snapshot is the full list of lines with each product's display
//! fields; the liked snapshot is a list of ids.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    liked::LikedSet,
    pricing::{PricingError, money_from_decimal, money_to_decimal},
    products::{Product, ProductId},
};

/// Storage key for the cart snapshot.
pub const CART_KEY: &str = "shoppingCart";

/// Storage key for the liked ids snapshot.
pub const LIKED_KEY: &str = "likedProducts";

/// Errors raised while encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot is not valid JSON of the expected shape.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A line carries an unusable price.
    #[error("invalid price in snapshot: {0}")]
    Price(#[from] PricingError),

    /// The decoded lines do not form a valid cart.
    #[error("invalid cart in snapshot: {0}")]
    Cart(#[from] CartError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineSnapshot {
    id: ProductId,
    name: String,
    price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    quantity: u32,
}

impl From<&CartLine> for CartLineSnapshot {
    fn from(line: &CartLine) -> Self {
        let product = line.product();

        Self {
            id: product.id,
            name: product.name.clone(),
            price: money_to_decimal(&product.price),
            image_url: product.image_url.clone(),
            quantity: line.quantity().get(),
        }
    }
}

/// Serialize every line of `cart`.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if serialization fails.
pub fn encode_cart(cart: &Cart) -> Result<String, SnapshotError> {
    let lines: Vec<CartLineSnapshot> = cart.iter().map(CartLineSnapshot::from).collect();

    Ok(serde_json::to_string(&lines)?)
}

/// Rebuild a cart from a snapshot.
///
/// Lines with a zero quantity are dropped and repeated ids are merged into the
/// first occurrence by summing quantities, so a hand-edited or legacy snapshot
/// still satisfies the one-line-per-product rule.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the JSON is malformed or a price is invalid.
pub fn decode_cart(raw: &str, currency: &'static Currency) -> Result<Cart, SnapshotError> {
    let snapshots: Vec<CartLineSnapshot> = serde_json::from_str(raw)?;

    let mut lines: Vec<CartLine> = Vec::with_capacity(snapshots.len());
    let mut positions: FxHashMap<ProductId, usize> = FxHashMap::default();

    for snapshot in snapshots {
        let Some(quantity) = NonZeroU32::new(snapshot.quantity) else {
            continue;
        };

        if let Some(line) = positions
            .get(&snapshot.id)
            .and_then(|&position| lines.get_mut(position))
        {
            line.set_quantity(line.quantity().saturating_add(quantity.get()));
            continue;
        }

        let product = Product {
            id: snapshot.id,
            name: snapshot.name,
            price: money_from_decimal(snapshot.price, currency)?,
            image_url: snapshot.image_url,
        };

        positions.insert(snapshot.id, lines.len());
        lines.push(CartLine::new(product, quantity));
    }

    Ok(Cart::with_lines(lines, currency)?)
}

/// Serialize the liked ids.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if serialization fails.
pub fn encode_liked(liked: &LikedSet) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&liked.ids())?)
}

/// Rebuild the liked set from a snapshot, collapsing duplicate ids.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the JSON is malformed.
pub fn decode_liked(raw: &str) -> Result<LikedSet, SnapshotError> {
    let ids: Vec<ProductId> = serde_json::from_str(raw)?;

    Ok(ids.into_iter().collect())
}
