//! Session flags over the persistent store.
//!
//! Mirrors the original three-key layout (`isLoggedIn`, `userEmail`,
//! `userName`): set on login or signup, cleared on logout, read at startup to
//! gate route access. Absent keys mean "not signed in".

use crate::store::{SharedStore, StoreError, keys};

/// The signed-in user as seen by every view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
}

/// Process-wide session state backed by the store.
pub struct Session {
    store: SharedStore,
}

impl Session {
    /// Create a session over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Whether a user is currently signed in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.get(keys::IS_LOGGED_IN).as_deref() == Some("true")
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        if !self.is_logged_in() {
            return None;
        }
        Some(SessionUser {
            name: self.store.get(keys::USER_NAME)?,
            email: self.store.get(keys::USER_EMAIL)?,
        })
    }

    /// Mark `user` as signed in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the flags could not be persisted.
    pub fn sign_in(&self, user: &SessionUser) -> Result<(), StoreError> {
        self.store.set(keys::IS_LOGGED_IN, "true")?;
        self.store.set(keys::USER_EMAIL, &user.email)?;
        self.store.set(keys::USER_NAME, &user.name)?;
        Ok(())
    }

    /// Clear the session flags.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the flags could not be removed.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(keys::IS_LOGGED_IN)?;
        self.store.remove(keys::USER_EMAIL)?;
        self.store.remove(keys::USER_NAME)?;
        Ok(())
    }
}
