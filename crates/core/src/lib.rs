//! Hayat Core - Shared types library.
//!
//! This crate provides the domain types used across the Hayat storefront:
//! - `storefront` - Public REST API for accounts, orders and the catalog
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Anything that can be decided from values alone (campaign
//! windows, price shaping, address type discrimination) lives here so it can
//! be tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, emails and address types
//! - [`pricing`] - Campaign window and tie-break rules, price shaping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{ActiveCampaign, CampaignOffer, CampaignTieBreak, CampaignWindow, ProductPricing};
pub use types::*;
