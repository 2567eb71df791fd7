//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_IDENTITY_HEADER` - Header carrying the authenticated user identifier,
//!   set by the upstream auth gateway (default: x-authenticated-user)
//! - `STOREFRONT_CONTENT_DIR` - Directory holding `menu.json` / `footer.json`
//!   (default: crates/storefront/content)
//! - `STOREFRONT_PRODUCT_LIMIT` - Maximum products returned by `/products` (default: 30)
//! - `STOREFRONT_COMPANY_ID` - Company row served by `/company` (default: 1)
//! - `PRICING_UTC_OFFSET_MINUTES` - Offset of the server time zone used to decide
//!   the current date for campaigns (default: 0)
//! - `PRICING_CAMPAIGN_TIE_BREAK` - `first`, `lowest_price` or `latest` (default: first)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderName;
use chrono::{FixedOffset, Offset, Utc};
use hayat_core::{CampaignTieBreak, CompanyId};
use secrecy::SecretString;
use thiserror::Error;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Header the auth gateway uses to pass the caller's identifier
    pub identity_header: HeaderName,
    /// Directory with JSON content documents
    pub content_dir: PathBuf,
    /// Maximum number of products in the unfiltered listing
    pub product_limit: i64,
    /// Company profile served by `/company`
    pub company_id: CompanyId,
    /// Campaign pricing settings
    pub pricing: PricingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Campaign pricing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Offset of the zone whose calendar date decides campaign validity.
    pub utc_offset: FixedOffset,
    /// Entry selection when a product has several campaign entries.
    pub tie_break: CampaignTieBreak,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            tie_break: CampaignTieBreak::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Source(lookup);

        let database_url = env
            .optional("STOREFRONT_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("STOREFRONT_DATABASE_URL".to_string()))?;

        let host = env.parsed_or("STOREFRONT_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = env.parsed_or("STOREFRONT_PORT", 3000_u16)?;
        let identity_header = env.parsed_or(
            "STOREFRONT_IDENTITY_HEADER",
            HeaderName::from_static("x-authenticated-user"),
        )?;
        let content_dir = env
            .optional("STOREFRONT_CONTENT_DIR")
            .map_or_else(|| PathBuf::from("crates/storefront/content"), PathBuf::from);

        let product_limit = env.parsed_or("STOREFRONT_PRODUCT_LIMIT", 30_i64)?;
        if product_limit <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_PRODUCT_LIMIT".to_string(),
                "must be positive".to_string(),
            ));
        }

        let company_id = CompanyId::new(env.parsed_or("STOREFRONT_COMPANY_ID", 1_i32)?);
        let pricing = PricingConfig::from_source(&env)?;

        Ok(Self {
            database_url,
            host,
            port,
            identity_header,
            content_dir,
            product_limit,
            company_id,
            pricing,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PricingConfig {
    fn from_source<F>(env: &Source<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let minutes = env.parsed_or("PRICING_UTC_OFFSET_MINUTES", 0_i32)?;
        let utc_offset = utc_offset_from_minutes(minutes).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "PRICING_UTC_OFFSET_MINUTES".to_string(),
                format!("{minutes} is outside -{MINUTES_PER_DAY}..{MINUTES_PER_DAY}"),
            )
        })?;
        let tie_break = env.parsed_or("PRICING_CAMPAIGN_TIE_BREAK", CampaignTieBreak::First)?;

        Ok(Self {
            utc_offset,
            tie_break,
        })
    }
}

/// Convert an offset in minutes to a `FixedOffset`, rejecting a full day or more.
fn utc_offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if minutes.abs() >= MINUTES_PER_DAY {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Key lookup wrapper shared by the config sections.
struct Source<F>(F);

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, or use `default` when it is unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => Ok(default),
        }
    }
}
