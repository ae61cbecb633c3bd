//! Liked products

use rustc_hash::FxHashSet;

use crate::products::{Product, ProductId};

/// The wishlist: a set of product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedSet {
    ids: FxHashSet<ProductId>,
}

impl LikedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`, returning whether it is liked afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Check whether `id` is liked.
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Liked ids in ascending order.
    pub fn ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Filter a catalog down to the liked products, keeping catalog order.
    pub fn filter<'p>(&self, products: &'p [Product]) -> Vec<&'p Product> {
        products
            .iter()
            .filter(|product| self.contains(product.id))
            .collect()
    }

    /// Number of liked products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is liked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<ProductId> for LikedSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};

    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut liked = LikedSet::new();

        assert!(liked.toggle(ProductId::new(3)));
        assert!(liked.contains(ProductId::new(3)));

        assert!(!liked.toggle(ProductId::new(3)));
        assert!(liked.is_empty());
    }

    #[test]
    fn toggle_twice_restores_prior_state() {
        let mut liked: LikedSet = [1, 2].into_iter().map(ProductId::new).collect();
        let before = liked.clone();

        for id in [2, 5] {
            liked.toggle(ProductId::new(id));
            liked.toggle(ProductId::new(id));
        }

        assert_eq!(liked, before);
    }

    #[test]
    fn from_iter_collapses_duplicates() {
        let liked: LikedSet = [4, 4, 1].into_iter().map(ProductId::new).collect();

        assert_eq!(liked.len(), 2);
        assert_eq!(liked.ids(), vec![ProductId::new(1), ProductId::new(4)]);
    }

    #[test]
    fn filter_keeps_catalog_order() {
        let products = [
            Product::new(3, "C", Money::from_minor(100, USD)),
            Product::new(1, "A", Money::from_minor(100, USD)),
            Product::new(2, "B", Money::from_minor(100, USD)),
        ];
        let liked: LikedSet = [1, 3].into_iter().map(ProductId::new).collect();

        let names: Vec<&str> = liked
            .filter(&products)
            .into_iter()
            .map(|product| product.name.as_str())
            .collect();

        assert_eq!(names, vec!["C", "A"]);
    }
}
