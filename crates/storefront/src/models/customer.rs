//! Customer records.

use chrono::{DateTime, Utc};
use hayat_core::{CustomerId, Email};

/// A storefront customer.
///
/// `identifier` is the opaque id issued by the authentication gateway and is
/// unique across customers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Editable customer fields, validated.
///
/// Used both for registration and for updating account details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
}
