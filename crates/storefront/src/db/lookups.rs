//! Reference-table lookups that turn foreign keys into display values.
//!
//! The batch methods take a slice of ids and return a map so a list response
//! costs one query per lookup table rather than one per row.

use std::collections::HashMap;

use sqlx::PgPool;

use hayat_core::{CityId, CountryId, CurrencyId, OrderStatusId, SentMethodId};

use super::RepositoryError;
use crate::models::Country;

/// Repository for the country, city, currency, status and sent-method tables.
pub struct LookupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LookupRepository<'a> {
    /// Create a new lookup repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Currency codes keyed by currency id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn currency_codes(&self, ids: &[CurrencyId]) -> Result<HashMap<CurrencyId, String>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (CurrencyId, String)>(
            "SELECT id, code FROM storefront.currency WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Countries keyed by country id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn countries(&self, ids: &[CountryId]) -> Result<HashMap<CountryId, Country>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Country>(
            "SELECT id, name, code3 FROM storefront.country WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|c| (c.id, c)).collect())
    }

    /// City names keyed by city id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn city_names(&self, ids: &[CityId]) -> Result<HashMap<CityId, String>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (CityId, String)>(
            "SELECT id, name FROM storefront.city WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Order status names keyed by status id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_status_names(
        &self,
        ids: &[OrderStatusId],
    ) -> Result<HashMap<OrderStatusId, String>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (OrderStatusId, String)>(
            "SELECT id, name FROM storefront.sales_order_status WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Name of a shipping method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sent_method_name(&self, id: SentMethodId) -> Result<Option<String>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM storefront.sent_method WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(name)
    }

    /// Country id for an ISO alpha-3 code, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn country_id_by_code(&self, code3: &str) -> Result<Option<CountryId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CountryId>(
            "SELECT id FROM storefront.country WHERE upper(code3) = upper($1)",
        )
        .bind(code3)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// City id for a name, matched case-insensitively. The lowest id wins on duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn city_id_by_name(&self, name: &str) -> Result<Option<CityId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CityId>(
            "SELECT id FROM storefront.city WHERE lower(name) = lower($1) ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }
}
