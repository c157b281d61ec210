//! Integration tests for DheeKart.
//!
//! The scenario tests live under `tests/` and exercise the storefront state
//! core end to end: several components wired over one shared persistent
//! store, the way the demo binary wires them.
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart and stock reconciliation across reloads
//! - `checkout_flow` - order placement atomicity and delayed redirects
//! - `auth_flow` - login, signup, and session flags over one store
//! - `shared_state` - cross-view observation through cloned handles
//!
//! No network access is required: the tests use file-backed and in-memory
//! stores and never touch the catalog feed.
