//! Address shaping: lookups, response view and shipping/billing split.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use hayat_core::{AddressId, AddressType, CityId, CountryId};

use super::{ShapingError, lookup};
use crate::db::{LookupRepository, RepositoryError};
use crate::models::{Country, CustomerAddress};

/// An address as returned to the client.
///
/// `country` is the alpha-3 code the client sends back on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    #[serde(serialize_with = "crate::services::id_string")]
    pub id: AddressId,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub country_name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub email: String,
}

/// A customer's addresses split by type.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBook {
    pub shipping_address: Vec<AddressView>,
    pub billing_address: Vec<AddressView>,
}

/// Country and city rows needed to render a set of addresses.
#[derive(Debug, Default)]
pub struct AddressLookups {
    countries: HashMap<CountryId, Country>,
    cities: HashMap<CityId, String>,
}

impl AddressLookups {
    #[must_use]
    pub const fn new(countries: HashMap<CountryId, Country>, cities: HashMap<CityId, String>) -> Self {
        Self { countries, cities }
    }

    /// Load the countries and cities referenced by `addresses`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a lookup query fails.
    pub async fn load<'a, I>(repo: &LookupRepository<'_>, addresses: I) -> Result<Self, RepositoryError>
    where
        I: IntoIterator<Item = &'a CustomerAddress>,
    {
        let mut country_ids = HashSet::new();
        let mut city_ids = HashSet::new();
        for address in addresses {
            country_ids.insert(address.country_id);
            city_ids.insert(address.city_id);
        }

        let country_ids: Vec<_> = country_ids.into_iter().collect();
        let city_ids: Vec<_> = city_ids.into_iter().collect();

        Ok(Self {
            countries: repo.countries(&country_ids).await?,
            cities: repo.city_names(&city_ids).await?,
        })
    }

    /// Render one address.
    ///
    /// # Errors
    ///
    /// Returns `ShapingError::MissingLookup` if its country or city row is gone.
    pub fn view(&self, address: &CustomerAddress) -> Result<AddressView, ShapingError> {
        let country = lookup(&self.countries, "country", address.country_id)?;
        let city = lookup(&self.cities, "city", address.city_id)?;

        Ok(AddressView {
            id: address.id,
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            country: country.code3.clone(),
            country_name: country.name.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone(),
            city: city.clone(),
            postal_code: address.postal_code.clone(),
            phone_number: address.phone.clone(),
            email: address.email.clone(),
        })
    }
}

/// Split addresses into shipping and billing lists, keeping their order.
///
/// Rows with an unknown type discriminator are left out and logged.
///
/// # Errors
///
/// Returns `ShapingError::MissingLookup` if an address cannot be rendered.
pub fn partition_addresses(
    addresses: &[CustomerAddress],
    lookups: &AddressLookups,
) -> Result<AddressBook, ShapingError> {
    let mut book = AddressBook::default();

    for address in addresses {
        let bucket = match address.address_type() {
            Some(AddressType::Shipping) => &mut book.shipping_address,
            Some(AddressType::Billing) => &mut book.billing_address,
            None => {
                tracing::warn!(
                    address_id = %address.id,
                    address_type_id = address.address_type_id,
                    "Skipping address with unknown type"
                );
                continue;
            }
        };
        bucket.push(lookups.view(address)?);
    }

    Ok(book)
}
