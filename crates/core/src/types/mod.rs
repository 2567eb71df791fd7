//! Core types for the Hayat storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod money;

pub use address::{AddressType, AddressTypeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, CurrencyCodeError, Money};
