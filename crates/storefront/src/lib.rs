//! DheeKart Storefront - client-side storefront state core.
//!
//! This crate owns the state model behind the DheeKart demo storefront:
//! product availability, cart, wishlist, mock authentication, and a simulated
//! checkout, all persisted in a local synchronous key-value store.
//!
//! # Architecture
//!
//! - [`store`] - persistent key-value layer (the `localStorage` analogue);
//!   every other component reads and writes through it
//! - [`stock`] - per-product stock/discount/rating oracle, memoized in the store
//! - [`cart`] / [`wishlist`] - authoritative ledgers behind cheaply-cloneable
//!   handles; every consuming view shares the same instance and observes
//!   mutations through a revision channel
//! - [`checkout`] - order finalizer that atomically snapshots and clears the
//!   cart, plus cancelable delayed navigation
//! - [`catalog`] - read-only HTTP client for the external product feed
//! - [`services::auth`] - login/signup over the mock credential directory
//!
//! The cart and wishlist are single-writer by construction: all mutations run
//! to completion synchronously and mirror the full collection to the store
//! before returning. A storage failure leaves the in-memory ledger
//! authoritative until the next successful write; there is no recovery logic.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod stock;
pub mod store;
pub mod wishlist;

pub use cart::{CartHandle, CartLineItem};
pub use catalog::{CatalogClient, CatalogError, Product};
pub use checkout::{CheckoutService, OrderConfirmation, RedirectGuard};
pub use config::StorefrontConfig;
pub use error::AppError;
pub use session::Session;
pub use stock::StockOracle;
pub use store::{FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use wishlist::WishlistHandle;
