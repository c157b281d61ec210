//! DheeKart Storefront - demo shell.
//!
//! Drives the storefront state core end to end against the real product
//! feed: hydrate from the persistent store, sign in with a demo account,
//! fetch the catalog, fill the cart within derived stock limits, and place a
//! simulated order. Everything of interest is logged; there is no UI.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dheekart_storefront::checkout::{self, PaymentMethod, ShippingAddress};
use dheekart_storefront::error::Result;
use dheekart_storefront::services::auth::AuthService;
use dheekart_storefront::store::FileStore;
use dheekart_storefront::{
    CartHandle, CatalogClient, CheckoutService, SharedStore, StockOracle, StorefrontConfig,
    WishlistHandle,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dheekart_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env()?;
    let store: SharedStore = Arc::new(FileStore::open(&config.data_file)?);
    tracing::info!(path = %config.data_file.display(), "persistent store opened");

    // One authoritative handle per collection, shared by every consumer
    let cart = CartHandle::hydrate(Arc::clone(&store));
    let wishlist = WishlistHandle::hydrate(Arc::clone(&store));
    let oracle = StockOracle::new(Arc::clone(&store));
    let auth = AuthService::new(Arc::clone(&store));

    if let Some(user) = auth.current_user() {
        tracing::info!(name = %user.name, "session restored");
    } else {
        let user = auth.login("john@gmail.com", "john123")?;
        tracing::info!(name = %user.name, "logged in with demo account");
    }

    tracing::info!(
        cart_lines = cart.snapshot().len(),
        wishlist_entries = wishlist.len(),
        "hydrated state"
    );

    // A failed fetch leaves cart and wishlist untouched
    let catalog = CatalogClient::new(&config);
    let products = match catalog.products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "catalog unavailable, nothing to browse");
            return Ok(());
        }
    };
    tracing::info!(count = products.len(), "catalog loaded");

    let categories = catalog.categories().await?;
    tracing::info!(?categories, "categories derived from the listing");

    if let Some(category) = categories.first() {
        let hits = catalog.search("e", Some(category)).await?;
        tracing::info!(%category, matches = hits.len(), "sample search");
    }

    for product in products.iter().take(3) {
        let record = oracle.record(product.id);
        let available = oracle.available_stock(product.id, cart.quantity_of(product.id));
        tracing::info!(
            id = %product.id,
            title = %product.title,
            stock = available,
            discount = record.discount_percent,
            rating = %record.rating,
            price = %oracle.discounted_price(product),
            "product"
        );

        if cart.add_item(product, available) {
            tracing::info!(id = %product.id, "added to cart");
        } else {
            tracing::warn!(id = %product.id, "out of stock");
        }
    }

    if let Some(first) = products.first() {
        let wishlisted = wishlist.toggle(first);
        tracing::info!(id = %first.id, wishlisted, "toggled wishlist");
    }

    tracing::info!(
        total_items = cart.total_quantity(),
        total_price = %cart.total_price(),
        "cart ready for checkout"
    );

    let service = CheckoutService::new(cart.clone());
    let confirmation = service.place_order(
        &ShippingAddress {
            full_name: "John Doe".to_owned(),
            address_line: "1 Demo Street".to_owned(),
            city: "Chennai".to_owned(),
            pincode: "600001".to_owned(),
            phone: "9876543210".to_owned(),
        },
        PaymentMethod::CashOnDelivery,
    )?;

    tracing::info!(
        order_id = %confirmation.order_id,
        total = %confirmation.total,
        cart_empty = cart.is_empty(),
        "order placed"
    );

    // Simulated navigation back to the catalog after the configured delay
    let redirect = checkout::redirect_after(config.redirect_delay, || {
        tracing::info!("redirecting to catalog");
    });
    redirect.wait().await;

    Ok(())
}
