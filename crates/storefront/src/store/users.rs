//! Mock credential directory.
//!
//! A plaintext user directory backed by the persistent store under the
//! `registeredUsers` key, seeded with four fixed demo accounts on first
//! access. Real authentication is deliberately out of scope: these records
//! exist so the login/signup flow has something to validate against.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{SharedStore, StoreError, StoreExt, keys};

/// Errors raised by the credential directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The persisted user list could not be written.
    #[error("directory store error: {0}")]
    Store(#[from] StoreError),
}

/// A registered demo account.
///
/// Stored verbatim (password included) - this is a mock directory, not an
/// identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisteredUser {
    fn demo(email: &str, password: &str, name: &str) -> Self {
        Self {
            email: email.to_owned(),
            password: password.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// The four demo accounts seeded on first access.
fn demo_users() -> Vec<RegisteredUser> {
    vec![
        RegisteredUser::demo("john@gmail.com", "john123", "John Doe"),
        RegisteredUser::demo("jane@gmail.com", "jane123", "Jane Smith"),
        RegisteredUser::demo("test@gmail.com", "test123", "Test User"),
        RegisteredUser::demo("admin@dheekart.com", "admin123", "Admin"),
    ]
}

/// Directory of registered users over the persistent store.
pub struct UserDirectory {
    store: SharedStore,
}

impl UserDirectory {
    /// Create a directory over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Load all registered users, seeding the demo accounts on first access.
    ///
    /// A corrupt persisted list falls back to the seeds without overwriting
    /// the stored value.
    #[must_use]
    pub fn all(&self) -> Vec<RegisteredUser> {
        match self.store.get(keys::REGISTERED_USERS) {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "corrupt registeredUsers, using demo seed");
                demo_users()
            }),
            None => {
                let seed = demo_users();
                if let Err(e) = self.store.set_json(keys::REGISTERED_USERS, &seed) {
                    tracing::warn!(error = %e, "failed to persist seeded demo users");
                }
                seed
            }
        }
    }

    /// Find a user by exact email/password match.
    #[must_use]
    pub fn find_user(&self, email: &str, password: &str) -> Option<RegisteredUser> {
        self.all()
            .into_iter()
            .find(|u| u.email == email && u.password == password)
    }

    /// Whether any account exists for `email`.
    #[must_use]
    pub fn is_email_registered(&self, email: &str) -> bool {
        self.all().iter().any(|u| u.email == email)
    }

    /// Append a new user record and persist the full list.
    ///
    /// Uniqueness is the caller's concern (the auth service checks
    /// [`Self::is_email_registered`] first).
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Store` if the list could not be persisted.
    pub fn add_user(&self, user: RegisteredUser) -> Result<RegisteredUser, DirectoryError> {
        let mut users = self.all();
        users.push(user.clone());
        self.store.set_json(keys::REGISTERED_USERS, &users)?;
        Ok(user)
    }
}
