//! Sales order repository.

use sqlx::PgPool;

use hayat_core::{CustomerId, SalesOrderId};

use super::RepositoryError;
use crate::models::{OrderItem, SalesOrder};

const ORDER_COLUMNS: &str = "id, customer_id, date, status_id, currency_id, total, \
     shipping_address_id, billing_address_id, sent_method_id, conditions";

/// Repository for sales orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders placed by a customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<SalesOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, SalesOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.sales_order WHERE customer_id = $1 ORDER BY date DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get an order by id, whoever placed it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SalesOrderId) -> Result<Option<SalesOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, SalesOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.sales_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Lines of an order joined with product title and featured image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: SalesOrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT i.product_id, i.quantity, p.title, i.price,
                   (SELECT img.image_link
                      FROM storefront.product_image img
                     WHERE img.product_id = p.id
                     ORDER BY img.is_feature DESC, img.id
                     LIMIT 1) AS image
            FROM storefront.sales_order_item i
            JOIN storefront.product p ON p.id = i.product_id
            WHERE i.sales_order_id = $1
            ORDER BY i.id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
