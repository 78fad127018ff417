//! Read-only product listing for the back-office.

use sqlx::PgPool;

use cafe_rencontre_core::Product;

use super::RepositoryError;

/// Repository for product queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image
            FROM cafe.product
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
