//! Reference data served by the catalog endpoints.

use hayat_core::{CategoryId, CompanyId, CountryId, ManufacturerId};

/// A product category with the number of products filed under it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub path: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
}

/// A country. `code3` is the ISO 3166 alpha-3 code clients send back.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub code3: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}
