//! Cart store
//!
//! Owns the cart and the liked set and mirrors both into [`SnapshotStorage`].
//! Every mutation is applied to a copy, the copy is written as a full
//! snapshot, and only then does it replace the in-memory state. A failed
//! write therefore leaves memory and storage agreeing on the previous state.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError, OrderLine},
    liked::LikedSet,
    products::{Product, ProductId},
    snapshots::{
        CART_KEY, LIKED_KEY, SnapshotError, decode_cart, decode_liked, encode_cart, encode_liked,
    },
    storage::{SnapshotStorage, StorageError},
};

/// Errors raised while persisting a mutation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The new state could not be encoded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The snapshot could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The mutation was refused by the cart.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// The cart and wishlist, kept in sync with durable storage.
#[derive(Debug)]
pub struct CartStore<S: SnapshotStorage> {
    cart: Cart,
    liked: LikedSet,
    storage: S,
}

impl<S: SnapshotStorage> CartStore<S> {
    /// Rehydrate the store from `storage`.
    ///
    /// Missing, unreadable or malformed snapshots start that collection empty;
    /// opening never fails.
    pub fn open(storage: S, currency: &'static Currency) -> Self {
        let cart = rehydrate(&storage, CART_KEY, |raw| decode_cart(raw, currency))
            .unwrap_or_else(|| Cart::new(currency));

        let liked = rehydrate(&storage, LIKED_KEY, decode_liked).unwrap_or_default();

        debug!(
            lines = cart.line_count(),
            liked = liked.len(),
            "rehydrated cart store"
        );

        Self {
            cart,
            liked,
            storage,
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current liked set.
    pub fn liked(&self) -> &LikedSet {
        &self.liked
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Id and quantity of every cart line, for submitting an order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.cart.order_lines()
    }

    /// Add one unit of `product` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cart`] for a product the cart cannot hold and a
    /// [`StoreError`] if the snapshot cannot be written; the cart is then
    /// unchanged.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), StoreError> {
        self.mutate_cart(|cart| cart.add(product))
    }

    /// Set the quantity of a line; zero or less removes it, unknown ids are ignored.
    ///
    /// Returns whether a line changed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written; the cart is
    /// then unchanged.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<bool, StoreError> {
        self.mutate_cart(|cart| Ok(cart.update_quantity(id, quantity)))
    }

    /// Remove a line, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written; the cart is
    /// then unchanged.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<bool, StoreError> {
        self.mutate_cart(|cart| Ok(cart.remove(id)))
    }

    /// Empty the cart and its snapshot together.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written; the cart is
    /// then unchanged.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.mutate_cart(|cart| {
            cart.clear();
            Ok(())
        })
    }

    /// Flip whether `id` is liked, returning whether it is liked afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written; the liked
    /// set is then unchanged.
    pub fn toggle_like(&mut self, id: ProductId) -> Result<bool, StoreError> {
        let mut next = self.liked.clone();
        let liked = next.toggle(id);

        self.storage.save(LIKED_KEY, &encode_liked(&next)?)?;
        self.liked = next;

        Ok(liked)
    }

    fn mutate_cart<T>(
        &mut self,
        mutate: impl FnOnce(&mut Cart) -> Result<T, CartError>,
    ) -> Result<T, StoreError> {
        let mut next = self.cart.clone();
        let outcome = mutate(&mut next)?;

        self.storage.save(CART_KEY, &encode_cart(&next)?)?;
        self.cart = next;

        Ok(outcome)
    }
}

fn rehydrate<S, T>(
    storage: &S,
    key: &str,
    decode: impl FnOnce(&str) -> Result<T, SnapshotError>,
) -> Option<T>
where
    S: SnapshotStorage,
{
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            warn!(key, %error, "failed to read snapshot, starting empty");
            return None;
        }
    };

    match decode(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "discarding malformed snapshot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    fn product(id: u64, minor: i64) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_minor(minor, USD))
    }

    /// Storage whose writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
    }

    impl SnapshotStorage for FlakyStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, data: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }

            self.inner.save(key, data)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn every_mutation_writes_a_full_snapshot() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new(), USD);

        store.add_to_cart(&product(1, 1000))?;
        store.add_to_cart(&product(2, 500))?;

        let raw = store.storage().get(CART_KEY).ok_or("no cart snapshot")?;
        assert_eq!(decode_cart(raw, USD)?, *store.cart());

        store.update_quantity(ProductId::new(1), 0)?;

        let raw = store.storage().get(CART_KEY).ok_or("no cart snapshot")?;
        assert_eq!(decode_cart(raw, USD)?.line_count(), 1);

        Ok(())
    }

    #[test]
    fn clear_cart_empties_memory_and_snapshot() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new(), USD);
        store.add_to_cart(&product(1, 1000))?;

        store.clear_cart()?;

        assert!(store.cart().is_empty());
        assert_eq!(store.storage().get(CART_KEY), Some("[]"));

        Ok(())
    }

    #[test]
    fn failed_write_leaves_state_unchanged() -> TestResult {
        let mut store = CartStore::open(FlakyStorage::default(), USD);
        store.add_to_cart(&product(1, 1000))?;
        store.toggle_like(ProductId::new(1))?;

        store.storage.fail_writes = true;

        assert!(store.clear_cart().is_err());
        assert!(store.add_to_cart(&product(2, 100)).is_err());
        assert!(store.toggle_like(ProductId::new(1)).is_err());

        assert_eq!(store.cart().line_count(), 1);
        assert!(store.liked().contains(ProductId::new(1)));

        let persisted = CartStore::open(store.storage.inner.clone(), USD);
        assert_eq!(persisted.cart(), store.cart());

        Ok(())
    }

    #[test]
    fn refused_products_never_reach_the_snapshot() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new(), USD);
        store.add_to_cart(&product(1, 1000))?;

        let negative = store.add_to_cart(&product(2, -100));
        let foreign = store.add_to_cart(&Product::new(
            3,
            "Scone",
            Money::from_minor(250, rusty_money::iso::GBP),
        ));

        assert!(matches!(
            negative,
            Err(StoreError::Cart(CartError::NegativePrice(_)))
        ));
        assert!(matches!(
            foreign,
            Err(StoreError::Cart(CartError::ForeignProduct(..)))
        ));

        let reopened = CartStore::open(store.storage().clone(), USD);

        assert_eq!(reopened.cart(), store.cart());
        assert_eq!(reopened.cart().subtotal()?, Money::from_minor(1000, USD));

        Ok(())
    }

    #[test]
    fn open_recovers_from_malformed_snapshots() {
        let storage = MemoryStorage::with_slots([(CART_KEY, "{oops"), (LIKED_KEY, "\"nope\"")]);

        let store = CartStore::open(storage, USD);

        assert!(store.cart().is_empty());
        assert!(store.liked().is_empty());
    }

    #[test]
    fn toggle_like_persists_ids() -> TestResult {
        let mut store = CartStore::open(MemoryStorage::new(), USD);

        assert!(store.toggle_like(ProductId::new(4))?);
        assert_eq!(store.storage().get(LIKED_KEY), Some("[4]"));

        assert!(!store.toggle_like(ProductId::new(4))?);
        assert_eq!(store.storage().get(LIKED_KEY), Some("[]"));

        Ok(())
    }
}
