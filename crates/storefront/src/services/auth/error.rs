//! Authentication error types.

use thiserror::Error;

use dheekart_core::EmailError;

use crate::store::StoreError;
use crate::store::users::DirectoryError;

/// Errors surfaced by the auth service. None of them mutate any state.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email is structurally invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The email is registered but the password does not match.
    #[error("incorrect password")]
    IncorrectPassword,

    /// No account exists for the email.
    #[error("email not registered")]
    EmailNotRegistered,

    /// Signup with an email that already has an account.
    #[error("email already registered")]
    EmailAlreadyRegistered,

    /// The credential directory could not be updated.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The session flags could not be persisted.
    #[error("session error: {0}")]
    Session(#[from] StoreError),
}
