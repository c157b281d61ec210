//! Unified application error type.
//!
//! Each module defines its own error enum; `AppError` unifies them for
//! callers that drive the whole flow (the demo binary, integration tests).
//! Nothing in this core is fatal: every failure degrades to a visible
//! message and an unchanged state snapshot.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The persistent store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The catalog feed could not be fetched.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Login or signup failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement was rejected.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
