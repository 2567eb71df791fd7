//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{CampaignRepository, LookupRepository};
use crate::services::pricing::PricingResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the database pool and configuration. Repositories borrow the pool per
/// request; nothing else is kept between requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// A pricing resolver backed by this state's pool and pricing rules.
    #[must_use]
    pub fn pricing(&self) -> PricingResolver<CampaignRepository<'_>, LookupRepository<'_>> {
        PricingResolver::new(
            CampaignRepository::new(self.pool()),
            LookupRepository::new(self.pool()),
            self.config().pricing,
        )
    }
}
