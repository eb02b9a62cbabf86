//! Product catalog lookups with demo fallback.
//!
//! Products come from `GET /api/products[/{id}]` and are cached with `moka`
//! (5-minute TTL). When the API is unreachable the built-in demo catalog
//! answers instead; demo answers are not cached so the API is used again as
//! soon as it comes back.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument};

use fashion_store_core::{Product, ProductId};

use super::{ServiceError, StoreApiClient};

const DEMO_CATALOG: &str = include_str!("../../data/demo_catalog.json");

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// The listing endpoint answers either a bare array or a page object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductsResponse {
    List(Vec<Product>),
    Page { products: Vec<Product> },
}

/// Client for catalog reads.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    api: StoreApiClient,
    cache: Cache<CacheKey, CacheValue>,
    demo: Vec<Product>,
}

impl CatalogClient {
    /// Create a catalog client over `api`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Parse` if the bundled demo catalog is malformed.
    pub fn new(api: StoreApiClient) -> Result<Self, ServiceError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        let demo = serde_json::from_str(DEMO_CATALOG)?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner { api, cache, demo }),
        })
    }

    /// The built-in demo catalog.
    #[must_use]
    pub fn demo_products(&self) -> &[Product] {
        &self.inner.demo
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if neither the API nor (when offline)
    /// the demo catalog knows the id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        match self
            .inner
            .api
            .get_json::<Product>(&["api", "products", id.as_str()])
            .await
        {
            Ok(product) => {
                self.inner
                    .cache
                    .insert(key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                Ok(product)
            }
            Err(e) if e.is_connectivity() => {
                debug!(error = %e, "Catalog offline, using demo catalog");
                self.demo_product(id)
            }
            Err(ServiceError::NotFound(_)) => Err(ServiceError::NotFound(id.to_string())),
            Err(e) => Err(e),
        }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if the API answers with an error other than a
    /// connectivity failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        match self
            .inner
            .api
            .get_json::<ProductsResponse>(&["api", "products"])
            .await
        {
            Ok(ProductsResponse::List(products) | ProductsResponse::Page { products }) => {
                self.inner
                    .cache
                    .insert(
                        CacheKey::Products,
                        CacheValue::Products(Arc::new(products.clone())),
                    )
                    .await;
                Ok(products)
            }
            Err(e) if e.is_connectivity() => {
                debug!(error = %e, "Catalog offline, using demo catalog");
                Ok(self.inner.demo.clone())
            }
            Err(e) => Err(e),
        }
    }

    fn demo_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        self.inner
            .demo
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}
