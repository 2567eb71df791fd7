//! Customer address records.

use hayat_core::{AddressId, AddressType, CityId, CountryId, CustomerId};

/// A stored customer address.
///
/// `address_type_id` is kept raw here; [`AddressType::from_id`] interprets it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerAddress {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub address_type_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country_id: CountryId,
    pub city_id: CityId,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
}

impl CustomerAddress {
    /// The address type, if the stored discriminator is a known one.
    #[must_use]
    pub fn address_type(&self) -> Option<AddressType> {
        AddressType::from_id(self.address_type_id).ok()
    }
}

/// Validated input for a new address, with lookups already resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub customer_id: CustomerId,
    pub address_type: AddressType,
    pub changes: AddressChanges,
}

/// Validated address fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country_id: CountryId,
    pub city_id: CityId,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
}
