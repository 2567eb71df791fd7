//! Hayat Storefront library.
//!
//! REST API for the storefront client: customer accounts, addresses, order
//! history, the product catalog with campaign pricing, and static content.
//! The binary in `main.rs` wires this library to configuration, Sentry and
//! the rate limiter.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
