//! Customer repository.

use sqlx::PgPool;

use hayat_core::CustomerId;

use super::RepositoryError;
use crate::models::{Customer, CustomerDetails};

const CUSTOMER_COLUMNS: &str =
    "id, identifier, first_name, last_name, email, phone, created_at";

/// Repository for customer records.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the customer id issued to a gateway identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id_by_identifier(&self, identifier: &str) -> Result<Option<CustomerId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CustomerId>(
            "SELECT id FROM storefront.customer WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM storefront.customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Register a customer for a gateway identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the identifier is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, identifier: &str, details: &CustomerDetails) -> Result<Customer, RepositoryError> {
        sqlx::query_as::<_, Customer>(&format!(
            r"
            INSERT INTO storefront.customer (identifier, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(identifier)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.email.as_str())
        .bind(details.phone.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "customer"))
    }

    /// Replace a customer's editable details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_details(&self, id: CustomerId, details: &CustomerDetails) -> Result<Customer, RepositoryError> {
        sqlx::query_as::<_, Customer>(&format!(
            r"
            UPDATE storefront.customer
            SET first_name = $2, last_name = $3, email = $4, phone = $5
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(details.email.as_str())
        .bind(details.phone.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
