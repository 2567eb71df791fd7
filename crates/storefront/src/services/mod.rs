//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `identity` - Resolve the gateway identifier to a customer, ownership checks
//! - `pricing` - Campaign pricing resolution
//! - `addresses` - Address lookups and shipping/billing partitioning
//! - `orders` - Order summaries and detail shaping
//! - `catalog` - Product and reference-data response shapes
//! - `content` - Static JSON content documents
//!
//! Services that need the store depend on small traits implemented by the
//! repositories in [`crate::db`], so they can be exercised with in-memory fakes.

pub mod addresses;
pub mod catalog;
pub mod content;
pub mod identity;
pub mod orders;
pub mod pricing;

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

use hayat_core::{CurrencyCode, CurrencyCodeError, CurrencyId};

/// A reference row needed to render a response is missing or unusable.
#[derive(Debug, Error)]
pub enum ShapingError {
    /// A foreign key points at a row that does not exist.
    #[error("no {table} row with id {id}")]
    MissingLookup { table: &'static str, id: i32 },

    /// A currency row holds something that is not a currency code.
    #[error(transparent)]
    InvalidCurrency(#[from] CurrencyCodeError),
}

/// Serialize an id as a JSON string; storefront clients treat ids as opaque.
pub(crate) fn id_string<T, S>(id: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(id)
}

/// Look up `id` in a batch lookup map.
pub(crate) fn lookup<'m, K, V>(
    map: &'m HashMap<K, V>,
    table: &'static str,
    id: K,
) -> Result<&'m V, ShapingError>
where
    K: Eq + Hash + Copy + Into<i32>,
{
    map.get(&id).ok_or_else(|| ShapingError::MissingLookup {
        table,
        id: id.into(),
    })
}

/// Resolve a currency id to a validated code.
pub(crate) fn currency(
    codes: &HashMap<CurrencyId, String>,
    id: CurrencyId,
) -> Result<CurrencyCode, ShapingError> {
    Ok(CurrencyCode::parse(lookup(codes, "currency", id)?)?)
}
