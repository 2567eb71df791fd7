//! Campaign repository.

use sqlx::PgPool;

use hayat_core::{CampaignId, ProductId};

use super::RepositoryError;
use crate::models::{Campaign, CampaignEntry};

/// Repository for campaigns and their product entries.
pub struct CampaignRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CampaignRepository<'a> {
    /// Create a new campaign repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every campaign entry listing a product, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn entries_for_product(&self, product_id: ProductId) -> Result<Vec<CampaignEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CampaignEntry>(
            r"
            SELECT id, product_id, campaign_id, old_price, new_price, percent
            FROM storefront.campaign_entry
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a campaign by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let row = sqlx::query_as::<_, Campaign>(
            "SELECT id, name, start_date, end_date FROM storefront.campaign WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
