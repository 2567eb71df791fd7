//! Caller identity extractors.
//!
//! The upstream authentication gateway verifies the caller and forwards an
//! opaque identifier in a trusted header (`x-authenticated-user` by default,
//! see `STOREFRONT_IDENTITY_HEADER`). The service never sees credentials.

use axum::{extract::FromRequestParts, http::request::Parts};

use hayat_core::CustomerId;

use crate::db::CustomerRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::CallerIdentity;
use crate::services::identity::IdentityResolver;
use crate::state::AppState;

/// Extractor that requires a gateway-supplied identity.
///
/// Rejects with `401 Unauthorized` when the header is missing, blank or not
/// valid text. Used by registration, where no customer exists yet.
///
/// # Example
///
/// ```rust,ignore
/// async fn register(RequireIdentity(identity): RequireIdentity) -> String {
///     format!("registering {identity}")
/// }
/// ```
pub struct RequireIdentity(pub CallerIdentity);

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = &state.config().identity_header;

        parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .and_then(CallerIdentity::new)
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor that resolves the caller to their customer record.
///
/// Rejects with `401` without an identity and `404` when the identity has
/// no registered customer.
pub struct CurrentCustomer(pub CustomerId);

impl FromRequestParts<AppState> for CurrentCustomer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequireIdentity(identity) = RequireIdentity::from_request_parts(parts, state).await?;

        let customer_id = IdentityResolver::new(CustomerRepository::new(state.pool()))
            .resolve_customer_id(&identity)
            .await?;

        tracing::Span::current().record("customer_id", customer_id.as_i32());
        set_sentry_user(&customer_id);

        Ok(Self(customer_id))
    }
}
