//! Persistent key-value store adapter.
//!
//! Thin contract over a synchronous local key-value store, the durable
//! analogue of browser `localStorage`. Every other component reads and writes
//! through it; all structured values are serialized as JSON strings.
//!
//! There is no transactional guarantee across keys. A failure between two
//! `set` calls can leave related keys inconsistent - accepted, since the
//! system is single-writer by construction.
//!
//! # Key layout
//!
//! - `cartItems` - serialized cart line item sequence
//! - `wishlistItems` - serialized product sequence
//! - `registeredUsers` - serialized mock credential records
//! - `isLoggedIn` / `userEmail` / `userName` - session flags
//! - `stock_{id}` / `discount_{id}` / `rating_{id}` - memoized per-product
//!   merchandising metadata
//!
//! Absence of a key is always "empty/default", never an error.

mod file;
mod memory;
pub mod users;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use dheekart_core::ProductId;

/// Errors raised by a persistent store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized or the store file is not valid JSON.
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous key-value store contract.
///
/// `get` treats every failure as absence; `set` and `remove` surface storage
/// errors so callers can decide whether drift is acceptable.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value could not be made durable.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` and its value. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the removal could not be made durable.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A shared, reference-counted store handle.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// JSON convenience layer over [`KeyValueStore`].
pub trait StoreExt: KeyValueStore {
    /// Read and deserialize a JSON value.
    ///
    /// A missing key yields `None`. A corrupt value is logged and treated as
    /// absent, matching the "absence is default" contract.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt persisted value");
                None
            }
        }
    }

    /// Serialize and store a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

/// Persisted key names, matching the original browser storage layout.
pub mod keys {
    use super::ProductId;

    /// Serialized cart line item sequence.
    pub const CART_ITEMS: &str = "cartItems";
    /// Serialized wishlist product sequence.
    pub const WISHLIST_ITEMS: &str = "wishlistItems";
    /// Serialized mock credential records.
    pub const REGISTERED_USERS: &str = "registeredUsers";
    /// Session flag: "true" when a user is signed in.
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    /// Session flag: signed-in user's email.
    pub const USER_EMAIL: &str = "userEmail";
    /// Session flag: signed-in user's display name.
    pub const USER_NAME: &str = "userName";

    /// Memoized base stock for a product.
    #[must_use]
    pub fn stock(id: ProductId) -> String {
        format!("stock_{id}")
    }

    /// Memoized discount percentage for a product.
    #[must_use]
    pub fn discount(id: ProductId) -> String {
        format!("discount_{id}")
    }

    /// Memoized rating for a product.
    #[must_use]
    pub fn rating(id: ProductId) -> String {
        format!("rating_{id}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_keys() {
        let id = ProductId::new(7);
        assert_eq!(keys::stock(id), "stock_7");
        assert_eq!(keys::discount(id), "discount_7");
        assert_eq!(keys::rating(id), "rating_7");
    }

    #[test]
    fn test_get_json_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = store.get_json("absent");
        assert!(value.is_none());
    }

    #[test]
    fn test_get_json_corrupt_value_is_absent() {
        let store = MemoryStore::new();
        store.set(keys::CART_ITEMS, "{not json").unwrap();
        let value: Option<Vec<u32>> = store.get_json(keys::CART_ITEMS);
        assert!(value.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let store = MemoryStore::new();
        store.set_json("numbers", &vec![1_u32, 2, 3]).unwrap();
        let value: Vec<u32> = store.get_json("numbers").unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }
}
