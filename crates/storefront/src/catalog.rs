//! Read-only client for the external product feed.
//!
//! The feed is the only network dependency: one HTTP GET returning
//! `{ "products": [...] }` in the dummyjson layout. A failed fetch surfaces
//! as [`CatalogError`] and never touches cart or wishlist state. Successful
//! responses are cached in-process for five minutes.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use dheekart_core::{Price, ProductId};

use crate::config::StorefrontConfig;

/// Cache TTL for catalog responses.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the (single) product listing.
const PRODUCTS_CACHE_KEY: &str = "products";

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure or undecodable response body.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("catalog feed returned status {0}")]
    Status(u16),
}

/// A catalog product, immutable for the session.
///
/// Denormalized copies of these fields travel into cart line items and
/// wishlist entries; unknown feed fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// First image URL, if the feed provided any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the title contains `query`, ignoring case.
    ///
    /// A blank query matches every product.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Distinct categories of a listing, in first-seen order.
///
/// The "all categories" sentinel is a presentation concern and is not
/// included.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

/// Products matching a title query and an optional category, in listing
/// order.
///
/// The two predicates combine: a blank query matches every title, and
/// `None` matches every category.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.matches_query(query))
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

/// Feed response envelope.
#[derive(Debug, Deserialize)]
struct ProductListing {
    products: Vec<Product>,
}

/// Client for the external catalog feed.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: url::Url,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.catalog_url.clone(),
                cache,
            }),
        }
    }

    /// Fetch the product listing, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` on transport or decode failure and
    /// `CatalogError::Status` on a non-success response. Neither failure
    /// affects any persisted state.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(hit) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("catalog cache hit");
            return Ok(hit);
        }

        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let listing: ProductListing = response.json().await?;
        let products = Arc::new(listing.products);
        debug!(count = products.len(), "fetched catalog");

        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Distinct categories of the current listing, in first-seen order.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::products`].
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let products = self.products().await?;
        Ok(categories(&products))
    }

    /// Fetch the listing and keep only products matching `query` and
    /// `category`; see [`filter_products`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::products`].
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>, CatalogError> {
        let products = self.products().await?;
        Ok(filter_products(&products, query, category)
            .into_iter()
            .cloned()
            .collect())
    }
}
