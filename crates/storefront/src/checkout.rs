//! Checkout finalizer.
//!
//! Checkout is simulated: no payment provider is called and the order cannot
//! fail once validation passes. The one hard guarantee is atomicity - the
//! cart is snapshotted and cleared under a single lock, so no reader ever
//! observes a confirmed order alongside a non-empty cart.
//!
//! The post-checkout transition back to the catalog is a fixed-delay timer
//! wrapped in a [`RedirectGuard`]; dropping the guard cancels the timer so it
//! can never fire after the initiating view is gone.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::cart::{CartHandle, CartLineItem};

/// Errors that abort order placement. No state is mutated when one is
/// returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no line items.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// A required shipping address field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Shipping address collected at checkout. All fields are required.
#[derive(Debug, Clone, Default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
}

/// Payment method selection. Both options are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Card,
}

/// Confirmation of a placed order.
///
/// By the time a confirmation exists, the cart has already been cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLineItem>,
    pub total: Decimal,
    pub payment: PaymentMethod,
}

/// Finalizes orders against the shared cart.
pub struct CheckoutService {
    cart: CartHandle,
}

impl CheckoutService {
    /// Create a checkout service over the shared cart handle.
    #[must_use]
    pub const fn new(cart: CartHandle) -> Self {
        Self { cart }
    }

    /// Place the order: validate, then atomically snapshot and clear the
    /// cart.
    ///
    /// The clear happens under the same lock that captures the snapshot, so
    /// the returned confirmation is never observable alongside a non-empty
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` if a required address field is
    /// blank and `CheckoutError::EmptyCart` if there is nothing to order.
    /// Neither mutates any state.
    pub fn place_order(
        &self,
        address: &ShippingAddress,
        payment: PaymentMethod,
    ) -> Result<OrderConfirmation, CheckoutError> {
        validate_address(address)?;

        let (lines, total) = self.cart.drain().ok_or(CheckoutError::EmptyCart)?;

        let confirmation = OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            lines,
            total,
            payment,
        };

        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.total,
            lines = confirmation.lines.len(),
            "order placed"
        );

        Ok(confirmation)
    }
}

fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    let required: [(&'static str, &str); 5] = [
        ("full name", &address.full_name),
        ("address line", &address.address_line),
        ("city", &address.city),
        ("pincode", &address.pincode),
        ("phone number", &address.phone),
    ];

    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(CheckoutError::MissingField(label));
        }
    }
    Ok(())
}

/// Handle to a pending delayed transition.
///
/// Dropping the guard aborts the timer; use [`Self::wait`] to let it fire.
#[derive(Debug)]
pub struct RedirectGuard {
    task: Option<JoinHandle<()>>,
}

impl RedirectGuard {
    /// Cancel the pending transition.
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the transition already fired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the transition to fire.
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            // The task is neither aborted nor panicking; join errors are moot
            let _ = task.await;
        }
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Schedule `transition` to run once after `delay`.
///
/// Used for the post-checkout redirect back to the catalog and the
/// post-signup auto-login. The returned guard is tied to the initiating
/// view's lifetime: dropping it cancels the transition.
pub fn redirect_after<F>(delay: Duration, transition: F) -> RedirectGuard
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        transition();
    });
    RedirectGuard { task: Some(task) }
}
