//! Domain models for the storefront.
//!
//! Row types map one-to-one onto tables in the `storefront` schema and derive
//! `sqlx::FromRow`; the repositories in [`crate::db`] return them directly.
//! Response shapes live next to the handlers and services that build them.

pub mod address;
pub mod campaign;
pub mod catalog;
pub mod customer;
pub mod identity;
pub mod order;
pub mod product;

pub use address::{AddressChanges, CustomerAddress, NewAddress};
pub use campaign::{Campaign, CampaignEntry};
pub use catalog::{Category, Company, Country, Manufacturer};
pub use customer::{Customer, CustomerDetails};
pub use identity::CallerIdentity;
pub use order::{OrderItem, SalesOrder};
pub use product::{Product, ProductImage};
