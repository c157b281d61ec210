//! Cart ledger and its shared handle.
//!
//! The [`CartLedger`] owns the authoritative line item list. Mutations are
//! stock-bounded (a line's quantity can never exceed the availability the
//! caller passes in) and every mutation mirrors the full ledger to the
//! persistent store before returning.
//!
//! Views never hold their own copy of the cart. They share one
//! [`CartHandle`], which guards the ledger with a mutex and broadcasts a
//! revision number over a watch channel: after any mutation through any
//! clone, every subscriber observes the updated ledger without re-reading
//! the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use dheekart_core::{Price, ProductId};

use crate::catalog::Product;
use crate::store::{SharedStore, StoreExt, keys};

/// One product entry in the cart, paired with a quantity.
///
/// Product fields are denormalized at add time; the quantity is always at
/// least 1 (a line that would reach 0 is removed instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            category: product.category.clone(),
            images: product.images.clone(),
            quantity: 1,
        }
    }

    /// Total for this line: `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.line_total(self.quantity)
    }
}

/// The authoritative cart collection plus its mutation rules.
///
/// Line items are insertion-ordered; removal compacts the sequence. At most
/// one line exists per product ID. All mutations persist the full ledger
/// under `cartItems`; a storage failure is logged and leaves the in-memory
/// state authoritative until the next successful write.
pub struct CartLedger {
    items: Vec<CartLineItem>,
    store: SharedStore,
}

impl CartLedger {
    /// Create a ledger hydrated from the store (empty if nothing persisted).
    #[must_use]
    pub fn hydrate(store: SharedStore) -> Self {
        let items: Vec<CartLineItem> = store.get_json(keys::CART_ITEMS).unwrap_or_default();
        debug!(lines = items.len(), "hydrated cart");
        Self { items, store }
    }

    /// Current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Quantity currently in the cart for a product (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|line| line.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`, bounded by `available_stock`.
    ///
    /// Returns `false` without mutating if there is no stock at all, or if
    /// the existing line is already at the available stock. Adding a product
    /// that is already in the cart increments its line; it never creates a
    /// second line for the same product.
    pub fn add_item(&mut self, product: &Product, available_stock: u32) -> bool {
        if available_stock == 0 {
            return false;
        }

        if let Some(line) = self.items.iter_mut().find(|line| line.id == product.id) {
            if line.quantity + 1 > available_stock {
                return false;
            }
            line.quantity += 1;
        } else {
            self.items.push(CartLineItem::from_product(product));
        }

        self.persist();
        true
    }

    /// Increment a line's quantity by one, bounded by `available_stock`.
    ///
    /// A no-op (returning `false`) if the product is not in the cart or the
    /// increment would exceed the available stock.
    pub fn increase_quantity(&mut self, id: ProductId, available_stock: u32) -> bool {
        let Some(line) = self.items.iter_mut().find(|line| line.id == id) else {
            return false;
        };
        if line.quantity + 1 > available_stock {
            return false;
        }

        line.quantity += 1;
        self.persist();
        true
    }

    /// Decrement a line's quantity by one, removing the line at quantity 1.
    ///
    /// The ledger never holds a line with quantity 0.
    pub fn decrease_quantity(&mut self, id: ProductId) {
        let Some(pos) = self.items.iter().position(|line| line.id == id) else {
            return;
        };

        // Indexing is safe: `pos` came from `position` on the same vec
        #[allow(clippy::indexing_slicing)]
        if self.items[pos].quantity > 1 {
            self.items[pos].quantity -= 1;
        } else {
            self.items.remove(pos);
        }
        self.persist();
    }

    /// Delete a line unconditionally.
    pub fn remove_item(&mut self, id: ProductId) {
        let before = self.items.len();
        self.items.retain(|line| line.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Empty the ledger.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of `price * quantity` over all lines, recomputed on every call.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    fn persist(&self) {
        if let Err(e) = self.store.set_json(keys::CART_ITEMS, &self.items) {
            warn!(error = %e, "failed to persist cart, in-memory state stays authoritative");
        }
    }
}

/// Cheaply-cloneable handle to the single authoritative [`CartLedger`].
///
/// Every consuming view holds a clone of the same handle; mutations bump a
/// revision broadcast to all subscribers.
#[derive(Clone)]
pub struct CartHandle {
    inner: Arc<CartHandleInner>,
}

struct CartHandleInner {
    ledger: Mutex<CartLedger>,
    revision: watch::Sender<u64>,
}

impl CartHandle {
    /// Create the shared handle, hydrating the ledger from the store once.
    #[must_use]
    pub fn hydrate(store: SharedStore) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(CartHandleInner {
                ledger: Mutex::new(CartLedger::hydrate(store)),
                revision,
            }),
        }
    }

    /// Subscribe to ledger revisions.
    ///
    /// The receiver is marked changed after every mutation through any clone
    /// of this handle; read the new state with [`Self::snapshot`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Copy of the current line items, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.lock().items().to_vec()
    }

    /// Quantity currently in the cart for a product (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lock().quantity_of(id)
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lock().total_price()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lock().total_quantity()
    }

    /// See [`CartLedger::add_item`].
    pub fn add_item(&self, product: &Product, available_stock: u32) -> bool {
        let added = self.lock().add_item(product, available_stock);
        if added {
            self.bump();
        }
        added
    }

    /// See [`CartLedger::increase_quantity`].
    pub fn increase_quantity(&self, id: ProductId, available_stock: u32) -> bool {
        let increased = self.lock().increase_quantity(id, available_stock);
        if increased {
            self.bump();
        }
        increased
    }

    /// See [`CartLedger::decrease_quantity`].
    pub fn decrease_quantity(&self, id: ProductId) {
        self.lock().decrease_quantity(id);
        self.bump();
    }

    /// See [`CartLedger::remove_item`].
    pub fn remove_item(&self, id: ProductId) {
        self.lock().remove_item(id);
        self.bump();
    }

    /// See [`CartLedger::clear`].
    pub fn clear(&self) {
        self.lock().clear();
        self.bump();
    }

    /// Atomically snapshot and empty the ledger for checkout.
    ///
    /// Returns `None` (with no mutation) if the cart is empty. Otherwise the
    /// lines and total are captured and the ledger is cleared and persisted
    /// under the same lock, so no reader can observe the order's lines still
    /// in the cart.
    #[must_use]
    pub fn drain(&self) -> Option<(Vec<CartLineItem>, Decimal)> {
        let mut ledger = self.lock();
        if ledger.is_empty() {
            return None;
        }

        let total = ledger.total_price();
        let lines = std::mem::take(&mut ledger.items);
        ledger.persist();
        drop(ledger);

        self.bump();
        Some((lines, total))
    }

    fn lock(&self) -> MutexGuard<'_, CartLedger> {
        self.inner
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreExt};

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::new(Decimal::from(price)),
            category: "test".to_owned(),
            images: vec![format!("https://cdn.example.com/{id}.png")],
        }
    }

    fn empty_cart() -> CartHandle {
        CartHandle::hydrate(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_item_inserts_quantity_one() {
        let cart = empty_cart();
        assert!(cart.add_item(&product(1, 100), 5));

        let lines = cart.snapshot();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 1);
        assert_eq!(cart.total_price(), Decimal::from(100));
    }

    #[test]
    fn test_add_item_with_zero_stock_is_rejected() {
        let cart = empty_cart();
        assert!(!cart.add_item(&product(1, 100), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_product_increments_not_duplicates() {
        let cart = empty_cart();
        assert!(cart.add_item(&product(1, 100), 5));
        assert!(cart.add_item(&product(1, 100), 5));

        let lines = cart.snapshot();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_quantity_never_exceeds_stock() {
        let cart = empty_cart();
        let p = product(1, 10);
        for _ in 0..20 {
            let _ = cart.add_item(&p, 4);
        }
        for _ in 0..20 {
            let _ = cart.increase_quantity(p.id, 4);
        }
        assert_eq!(cart.quantity_of(p.id), 4);
    }

    #[test]
    fn test_increase_at_cap_is_noop() {
        let cart = empty_cart();
        let p = product(1, 10);
        for _ in 0..4 {
            assert!(cart.add_item(&p, 4));
        }

        assert!(!cart.increase_quantity(p.id, 4));
        assert_eq!(cart.quantity_of(p.id), 4);
    }

    #[test]
    fn test_increase_absent_product_is_noop() {
        let cart = empty_cart();
        assert!(!cart.increase_quantity(ProductId::new(9), 10));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_removes_line_at_quantity_one() {
        let cart = empty_cart();
        let p = product(1, 10);
        assert!(cart.add_item(&p, 5));
        assert!(cart.add_item(&p, 5));

        cart.decrease_quantity(p.id);
        assert_eq!(cart.quantity_of(p.id), 1);

        cart.decrease_quantity(p.id);
        assert!(cart.is_empty(), "line at quantity 1 must be removed");
    }

    #[test]
    fn test_remove_item_compacts_order() {
        let cart = empty_cart();
        assert!(cart.add_item(&product(1, 10), 5));
        assert!(cart.add_item(&product(2, 20), 5));
        assert!(cart.add_item(&product(3, 30), 5));

        cart.remove_item(ProductId::new(2));
        let ids: Vec<i64> = cart.snapshot().iter().map(|l| l.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_totals_recomputed_per_call() {
        let cart = empty_cart();
        assert!(cart.add_item(&product(1, 100), 5));
        assert!(cart.add_item(&product(2, 50), 5));
        assert!(cart.increase_quantity(ProductId::new(2), 5));

        assert_eq!(cart.total_price(), Decimal::from(200));
        assert_eq!(cart.total_quantity(), 3);

        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.total_price(), Decimal::from(100));
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cart = CartHandle::hydrate(Arc::clone(&store));

        assert!(cart.add_item(&product(1, 10), 5));
        let persisted: Vec<CartLineItem> = store.get_json(keys::CART_ITEMS).unwrap();
        assert_eq!(persisted, cart.snapshot());

        cart.clear();
        let persisted: Vec<CartLineItem> = store.get_json(keys::CART_ITEMS).unwrap();
        assert!(persisted.is_empty());
    }

    #[test]
    fn test_hydrate_round_trip_preserves_order() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cart = CartHandle::hydrate(Arc::clone(&store));
        assert!(cart.add_item(&product(3, 30), 5));
        assert!(cart.add_item(&product(1, 10), 5));
        assert!(cart.add_item(&product(2, 20), 5));
        let before = cart.snapshot();

        let rehydrated = CartHandle::hydrate(store);
        assert_eq!(rehydrated.snapshot(), before);
    }

    #[test]
    fn test_clones_share_one_ledger() {
        let cart = empty_cart();
        let view_a = cart.clone();
        let view_b = cart.clone();

        assert!(view_a.add_item(&product(1, 10), 5));
        assert_eq!(view_b.quantity_of(ProductId::new(1)), 1);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_subscribers_observe_mutations() {
        let cart = empty_cart();
        let mut rx = cart.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert!(cart.add_item(&product(1, 10), 5));
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        // A rejected add must not signal a change
        assert!(!cart.add_item(&product(1, 10), 1));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_drain_empties_and_reports_total() {
        let cart = empty_cart();
        assert!(cart.add_item(&product(1, 50), 5));
        assert!(cart.add_item(&product(1, 50), 5));

        let (lines, total) = cart.drain().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 2);
        assert_eq!(total, Decimal::from(100));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_drain_empty_cart_is_none() {
        let cart = empty_cart();
        assert!(cart.drain().is_none());
    }
}
