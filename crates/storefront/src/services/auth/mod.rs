//! Authentication service.
//!
//! Mock-credential login and signup over the [`UserDirectory`] and the
//! session flags. Validation happens before any state is touched: a failed
//! login or signup leaves both the directory and the session unchanged.
//!
//! Signup deliberately does not sign the user in. The original flow shows a
//! success message and auto-logs-in after a delay; callers schedule
//! [`crate::checkout::redirect_after`] with [`AuthService::complete_signup`]
//! to reproduce that, and dropping the guard cancels the pending login.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use tracing::info;

use dheekart_core::Email;

use crate::session::{Session, SessionUser};
use crate::store::SharedStore;
use crate::store::users::{RegisteredUser, UserDirectory};

/// Authentication service over the mock credential directory.
pub struct AuthService {
    directory: UserDirectory,
    session: Session,
}

impl AuthService {
    /// Create an auth service over `store`.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            directory: UserDirectory::new(Arc::clone(&store)),
            session: Session::new(store),
        }
    }

    /// Log in with email and password, setting the session flags on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank fields,
    /// `AuthError::EmailNotRegistered` when no account exists, and
    /// `AuthError::IncorrectPassword` when the account exists but the
    /// password does not match.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        require("email", email)?;
        require("password", password)?;

        let Some(user) = self.directory.find_user(email, password) else {
            if self.directory.is_email_registered(email) {
                return Err(AuthError::IncorrectPassword);
            }
            return Err(AuthError::EmailNotRegistered);
        };

        let session_user = SessionUser {
            name: user.name,
            email: user.email,
        };
        self.session.sign_in(&session_user)?;

        info!(email = %session_user.email, "user logged in");
        Ok(session_user)
    }

    /// Register a new account. Does not sign in; see [`Self::complete_signup`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank fields,
    /// `AuthError::InvalidEmail` for a malformed email, and
    /// `AuthError::EmailAlreadyRegistered` for a duplicate. Nothing is
    /// mutated on failure.
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisteredUser, AuthError> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;
        Email::parse(email)?;

        if self.directory.is_email_registered(email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let user = self.directory.add_user(RegisteredUser {
            email: email.to_owned(),
            password: password.to_owned(),
            name: name.to_owned(),
        })?;

        info!(email = %user.email, "account created");
        Ok(user)
    }

    /// Finish the delayed post-signup auto-login.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the flags could not be persisted.
    pub fn complete_signup(&self, user: &RegisteredUser) -> Result<SessionUser, AuthError> {
        let session_user = SessionUser {
            name: user.name.clone(),
            email: user.email.clone(),
        };
        self.session.sign_in(&session_user)?;
        Ok(session_user)
    }

    /// Clear the session flags.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the flags could not be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.sign_out()?;
        info!("user logged out");
        Ok(())
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    /// Whether a user is currently signed in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }
}

fn require(label: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingField(label));
    }
    Ok(())
}
