//! Customer address repository.

use sqlx::PgPool;

use hayat_core::{AddressId, CustomerId};

use super::RepositoryError;
use crate::models::{AddressChanges, CustomerAddress, NewAddress};

const ADDRESS_COLUMNS: &str = "id, customer_id, address_type_id, first_name, last_name, email, phone, \
     country_id, city_id, address_line1, address_line2, postal_code";

/// Repository for customer addresses.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All addresses of a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<CustomerAddress>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerAddress>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM storefront.customer_address WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get an address by id, whoever owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AddressId) -> Result<Option<CustomerAddress>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerAddress>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM storefront.customer_address WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a new address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, address: &NewAddress) -> Result<CustomerAddress, RepositoryError> {
        let c = &address.changes;
        let row = sqlx::query_as::<_, CustomerAddress>(&format!(
            r"
            INSERT INTO storefront.customer_address
                (customer_id, address_type_id, first_name, last_name, email, phone,
                 country_id, city_id, address_line1, address_line2, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(address.customer_id)
        .bind(address.address_type.id())
        .bind(&c.first_name)
        .bind(&c.last_name)
        .bind(&c.email)
        .bind(&c.phone)
        .bind(c.country_id)
        .bind(c.city_id)
        .bind(&c.address_line1)
        .bind(c.address_line2.as_deref())
        .bind(&c.postal_code)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrite the editable fields of an address. The owner and type stay put.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: AddressId, changes: &AddressChanges) -> Result<CustomerAddress, RepositoryError> {
        sqlx::query_as::<_, CustomerAddress>(&format!(
            r"
            UPDATE storefront.customer_address
            SET first_name = $2, last_name = $3, email = $4, phone = $5,
                country_id = $6, city_id = $7, address_line1 = $8,
                address_line2 = $9, postal_code = $10
            WHERE id = $1
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.country_id)
        .bind(changes.city_id)
        .bind(&changes.address_line1)
        .bind(changes.address_line2.as_deref())
        .bind(&changes.postal_code)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}
