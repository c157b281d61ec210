//! DheeKart Core - Shared types library.
//!
//! This crate provides common types used across all DheeKart components:
//! - `storefront` - The storefront state core (catalog, cart, wishlist, checkout)
//! - `integration-tests` - Cross-component test scenarios
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no access to
//! the persistent store. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
