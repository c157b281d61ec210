//! Wishlist ledger and its shared handle.
//!
//! A set of denormalized products, unique by product ID, with toggle
//! semantics: toggling a wishlisted product removes it, toggling anything
//! else appends it. Same single-instance sharing and write-through
//! persistence model as the cart.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use dheekart_core::ProductId;

use crate::catalog::Product;
use crate::store::{SharedStore, StoreExt, keys};

/// The authoritative wishlist collection.
pub struct WishlistLedger {
    items: Vec<Product>,
    store: SharedStore,
}

impl WishlistLedger {
    /// Create a ledger hydrated from the store (empty if nothing persisted).
    #[must_use]
    pub fn hydrate(store: SharedStore) -> Self {
        let items: Vec<Product> = store.get_json(keys::WISHLIST_ITEMS).unwrap_or_default();
        debug!(entries = items.len(), "hydrated wishlist");
        Self { items, store }
    }

    /// Current wishlist entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Whether a product is wishlisted.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns `true` when the product is wishlisted after the call. Two
    /// toggles with the same product are a net no-op.
    pub fn toggle(&mut self, product: &Product) -> bool {
        let wishlisted = if self.contains(product.id) {
            self.items.retain(|p| p.id != product.id);
            false
        } else {
            self.items.push(product.clone());
            true
        };

        self.persist();
        wishlisted
    }

    fn persist(&self) {
        if let Err(e) = self.store.set_json(keys::WISHLIST_ITEMS, &self.items) {
            warn!(error = %e, "failed to persist wishlist, in-memory state stays authoritative");
        }
    }
}

/// Cheaply-cloneable handle to the single authoritative [`WishlistLedger`].
#[derive(Clone)]
pub struct WishlistHandle {
    inner: Arc<WishlistHandleInner>,
}

struct WishlistHandleInner {
    ledger: Mutex<WishlistLedger>,
    revision: watch::Sender<u64>,
}

impl WishlistHandle {
    /// Create the shared handle, hydrating the ledger from the store once.
    #[must_use]
    pub fn hydrate(store: SharedStore) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(WishlistHandleInner {
                ledger: Mutex::new(WishlistLedger::hydrate(store)),
                revision,
            }),
        }
    }

    /// Subscribe to ledger revisions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Copy of the current entries, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Product> {
        self.lock().items().to_vec()
    }

    /// Whether a product is wishlisted.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.lock().contains(id)
    }

    /// Number of wishlisted products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items().len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items().is_empty()
    }

    /// See [`WishlistLedger::toggle`].
    pub fn toggle(&self, product: &Product) -> bool {
        let wishlisted = self.lock().toggle(product);
        self.inner.revision.send_modify(|rev| *rev += 1);
        wishlisted
    }

    fn lock(&self) -> MutexGuard<'_, WishlistLedger> {
        self.inner
            .ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
