//! Trolley
//!
//! Trolley is the client-side core of a small shop: a cart that keeps one
//! line per product, a wishlist, exact money totals and a persistence bridge
//! that mirrors both collections into durable key-value storage.

pub mod cart;
pub mod liked;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod snapshots;
pub mod storage;
pub mod store;
