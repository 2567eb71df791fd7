//! Catalog reference data: categories, brands, countries, company profile.

use sqlx::PgPool;

use hayat_core::{CategoryId, CompanyId};

use super::RepositoryError;
use crate::models::{Category, Company, Country, Manufacturer};

/// Repository for the read-only catalog listings.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Categories with the number of products in each, including empty ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT c.id, c.name, c.path, COUNT(p.id) AS product_count
            FROM storefront.product_category c
            LEFT JOIN storefront.product p ON p.category_id = c.id
            GROUP BY c.id, c.name, c.path
            ORDER BY c.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Whether a category exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_exists(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM storefront.product_category WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// All manufacturers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn manufacturers(&self) -> Result<Vec<Manufacturer>, RepositoryError> {
        let rows = sqlx::query_as::<_, Manufacturer>(
            "SELECT id, name FROM storefront.manufacturer ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// All countries, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn countries(&self) -> Result<Vec<Country>, RepositoryError> {
        let rows = sqlx::query_as::<_, Country>(
            "SELECT id, name, code3 FROM storefront.country ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get the company profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn company(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let row = sqlx::query_as::<_, Company>(
            "SELECT id, name, email, address FROM storefront.company WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
