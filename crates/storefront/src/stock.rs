//! Per-product stock, discount, and rating oracle.
//!
//! The storefront has no server-side inventory, so availability and
//! merchandising metadata are synthesized pseudo-randomly per product and
//! memoized in the persistent store: the first call rolls a value, persists
//! it under a product-scoped key, and every later call (in any view, in any
//! session against the same store) returns the persisted value unchanged.
//!
//! Stock follows the same first-call-wins pattern as discount and rating, so
//! every view agrees on a product's availability. The cart-adjusted figure is
//! derived on demand: base stock minus the quantity already committed to the
//! cart, floored at zero.

use std::fmt::Display;
use std::str::FromStr;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::warn;

use dheekart_core::{Price, ProductId};

use crate::catalog::Product;
use crate::store::{SharedStore, keys};

/// Inclusive base stock range.
const STOCK_RANGE: std::ops::RangeInclusive<u32> = 5..=20;

/// Inclusive discount percentage range.
const DISCOUNT_RANGE: std::ops::RangeInclusive<u32> = 10..=59;

/// Inclusive rating range, in tenths (3.0 to 5.0).
const RATING_TENTHS_RANGE: std::ops::RangeInclusive<i64> = 30..=50;

/// Stable per-product merchandising metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRecord {
    pub product_id: ProductId,
    /// Base stock level, before subtracting cart commitments.
    pub base_stock: u32,
    /// Discount percentage applied to the list price.
    pub discount_percent: u32,
    /// Rating with one decimal place.
    pub rating: Decimal,
}

/// Oracle deriving per-product availability and metadata.
pub struct StockOracle {
    store: SharedStore,
}

impl StockOracle {
    /// Create an oracle over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Base stock for a product: rolled once in `[5, 20]`, then stable for
    /// the life of the persisted store.
    #[must_use]
    pub fn base_stock(&self, id: ProductId) -> u32 {
        self.memoized(&keys::stock(id), || rand::rng().random_range(STOCK_RANGE))
    }

    /// Stock still available to add: base stock minus the quantity already in
    /// the cart, floored at zero.
    #[must_use]
    pub fn available_stock(&self, id: ProductId, in_cart: u32) -> u32 {
        self.base_stock(id).saturating_sub(in_cart)
    }

    /// Discount percentage for a product: rolled once in `[10, 59]`.
    #[must_use]
    pub fn discount_percent(&self, id: ProductId) -> u32 {
        self.memoized(&keys::discount(id), || {
            rand::rng().random_range(DISCOUNT_RANGE)
        })
    }

    /// Rating for a product: rolled once in `[3.0, 5.0]` with one decimal.
    #[must_use]
    pub fn rating(&self, id: ProductId) -> Decimal {
        self.memoized(&keys::rating(id), || {
            Decimal::new(rand::rng().random_range(RATING_TENTHS_RANGE), 1)
        })
    }

    /// Price after the product's memoized discount, floored to a whole unit.
    #[must_use]
    pub fn discounted_price(&self, product: &Product) -> Price {
        product.price.discounted(self.discount_percent(product.id))
    }

    /// Full metadata record for a product.
    #[must_use]
    pub fn record(&self, id: ProductId) -> StockRecord {
        StockRecord {
            product_id: id,
            base_stock: self.base_stock(id),
            discount_percent: self.discount_percent(id),
            rating: self.rating(id),
        }
    }

    /// First-call-wins derivation: return the persisted value for `key`, or
    /// roll a fresh one and persist it. A corrupt persisted value is treated
    /// as absent and re-rolled; a failed persist still returns the rolled
    /// value (it just will not survive a reload).
    fn memoized<T>(&self, key: &str, roll: impl FnOnce() -> T) -> T
    where
        T: FromStr + Display + Copy,
    {
        if let Some(raw) = self.store.get(key) {
            if let Ok(value) = raw.parse::<T>() {
                return value;
            }
            warn!(key, raw, "corrupt persisted roll, re-rolling");
        }

        let value = roll();
        if let Err(e) = self.store.set(key, &value.to_string()) {
            warn!(key, error = %e, "failed to persist rolled value");
        }
        value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    fn oracle_with_store() -> (StockOracle, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        (StockOracle::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_base_stock_in_range() {
        let (oracle, _) = oracle_with_store();
        for raw in 0..50_i64 {
            let stock = oracle.base_stock(ProductId::new(raw));
            assert!((5..=20).contains(&stock), "stock {stock} out of range");
        }
    }

    #[test]
    fn test_base_stock_is_stable() {
        let (oracle, _) = oracle_with_store();
        let id = ProductId::new(1);
        let first = oracle.base_stock(id);
        for _ in 0..10 {
            assert_eq!(oracle.base_stock(id), first);
        }
    }

    #[test]
    fn test_base_stock_survives_new_oracle_on_same_store() {
        let (oracle, store) = oracle_with_store();
        let id = ProductId::new(9);
        let first = oracle.base_stock(id);

        let second_oracle = StockOracle::new(store);
        assert_eq!(second_oracle.base_stock(id), first);
    }

    #[test]
    fn test_available_stock_subtracts_cart_quantity() {
        let (oracle, store) = oracle_with_store();
        let id = ProductId::new(3);
        store.set(&keys::stock(id), "8").unwrap();

        assert_eq!(oracle.available_stock(id, 0), 8);
        assert_eq!(oracle.available_stock(id, 3), 5);
    }

    #[test]
    fn test_available_stock_floors_at_zero() {
        let (oracle, store) = oracle_with_store();
        let id = ProductId::new(3);
        store.set(&keys::stock(id), "5").unwrap();

        assert_eq!(oracle.available_stock(id, 99), 0);
    }

    #[test]
    fn test_discount_in_range_and_stable() {
        let (oracle, _) = oracle_with_store();
        let id = ProductId::new(2);
        let discount = oracle.discount_percent(id);
        assert!((10..=59).contains(&discount));
        assert_eq!(oracle.discount_percent(id), discount);
    }

    #[test]
    fn test_rating_in_range_with_one_decimal() {
        let (oracle, _) = oracle_with_store();
        let rating = oracle.rating(ProductId::new(4));
        assert!(rating >= Decimal::new(30, 1) && rating <= Decimal::new(50, 1));
        assert!(rating.scale() <= 1);
    }

    #[test]
    fn test_corrupt_roll_is_rerolled() {
        let (oracle, store) = oracle_with_store();
        let id = ProductId::new(5);
        store.set(&keys::stock(id), "not-a-number").unwrap();

        let stock = oracle.base_stock(id);
        assert!((5..=20).contains(&stock));
        // The fresh roll replaces the corrupt value
        assert_eq!(store.get(&keys::stock(id)).as_deref(), Some(&*stock.to_string()));
    }

    #[test]
    fn test_discounted_price_floors() {
        let (oracle, store) = oracle_with_store();
        let id = ProductId::new(6);
        store.set(&keys::discount(id), "50").unwrap();

        let product = Product {
            id,
            title: "Widget".to_owned(),
            price: Price::new(Decimal::new(9999, 2)), // 99.99
            category: String::new(),
            images: Vec::new(),
        };

        // 99.99 at 50% off = 49.995, floored to 49
        assert_eq!(
            oracle.discounted_price(&product),
            Price::new(Decimal::from(49))
        );
    }

    #[test]
    fn test_record_aggregates_all_rolls() {
        let (oracle, _) = oracle_with_store();
        let id = ProductId::new(7);
        let record = oracle.record(id);

        assert_eq!(record.product_id, id);
        assert_eq!(record.base_stock, oracle.base_stock(id));
        assert_eq!(record.discount_percent, oracle.discount_percent(id));
        assert_eq!(record.rating, oracle.rating(id));
    }
}
