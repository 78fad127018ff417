//! Cached product catalog.
//!
//! The full menu is small, so it is cached as one entry using `moka` and
//! reloaded from `PostgreSQL` when the entry expires. [`ProductCatalog::prime`]
//! fills the cache at startup so the first visitor does not pay for the load.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use cafe_rencontre_core::{Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};

const CATALOG_KEY: &str = "catalog";

/// Product lookup backed by a TTL cache.
#[derive(Clone)]
pub struct ProductCatalog {
    pool: PgPool,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl ProductCatalog {
    /// Create a catalog whose cache entry lives for `ttl`.
    #[must_use]
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { pool, cache }
    }

    /// Seed the cache with already loaded products.
    pub async fn prime(&self, products: Vec<Product>) {
        self.cache.insert(CATALOG_KEY, Arc::new(products)).await;
    }

    /// Load the catalog from the database into the cache.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn refresh(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        let products = Arc::new(ProductRepository::new(&self.pool).list().await?);
        self.cache.insert(CATALOG_KEY, Arc::clone(&products)).await;
        debug!(count = products.len(), "Catalog loaded");
        Ok(products)
    }

    /// Every product, by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the cache is cold and the
    /// query fails.
    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(products) = self.cache.get(CATALOG_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(products);
        }
        self.refresh().await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the cache is cold and the
    /// query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.all().await?.iter().find(|p| p.id == id).cloned())
    }

    /// Drop the cached catalog.
    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/cafe_rencontre_test")
            .unwrap()
    }

    #[tokio::test]
    async fn test_primed_catalog_serves_from_cache() {
        let catalog = ProductCatalog::new(lazy_pool(), Duration::from_secs(300));
        catalog
            .prime(vec![Product {
                id: ProductId::new(2),
                name: "Caramel Macchiato".to_owned(),
                description: "iced, sweet".to_owned(),
                price: Decimal::from(59),
                image: None,
            }])
            .await;

        assert_eq!(catalog.all().await.unwrap().len(), 1);
        assert_eq!(
            catalog.get(ProductId::new(2)).await.unwrap().unwrap().name,
            "Caramel Macchiato"
        );
        assert!(catalog.get(ProductId::new(9)).await.unwrap().is_none());
    }
}
