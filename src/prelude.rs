//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, OrderLine},
    liked::LikedSet,
    pricing::{PricingError, currency_from_code, money_from_decimal, money_to_decimal},
    products::{Product, ProductId},
    receipt::{ReceiptError, write_cart_to},
    snapshots::{CART_KEY, LIKED_KEY, SnapshotError},
    storage::{FileStorage, MemoryStorage, SnapshotStorage, StorageError},
    store::{CartStore, StoreError},
};
