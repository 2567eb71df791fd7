//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`. Every error becomes the
//! same JSON envelope:
//!
//! ```json
//! {
//!   "errorType": "404",
//!   "errorMessage": "Order not found",
//!   "errorCauses": [{ "errorMessage": "Please contact us providing the following error ID '…'" }]
//! }
//! ```
//!
//! The error ID is a fresh UUID logged next to the underlying error, so
//! support can find the log line without internals reaching the client.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use tower_governor::GovernorError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::RepositoryError;
use crate::services::ShapingError;
use crate::services::content::ContentError;
use crate::services::identity::IdentityError;
use crate::services::pricing::PricingError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No identity was supplied by the gateway.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found, including an identity with no customer record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource belongs to another customer.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request body failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The path exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Client exceeded the rate limit.
    #[error("Too many requests, retry after {retry_after}s")]
    TooManyRequests { retry_after: u64 },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::CustomerNotFound => Self::NotFound("Customer not found".to_string()),
            IdentityError::Forbidden => {
                Self::Forbidden("You do not have access to this resource".to_string())
            }
            IdentityError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Repository(e) => Self::Database(e),
            PricingError::Currency(e) => Self::from(e),
        }
    }
}

impl From<ShapingError> for AppError {
    fn from(err: ShapingError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<GovernorError> for AppError {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::TooManyRequests { wait_time, .. } => Self::TooManyRequests {
                retry_after: wait_time,
            },
            GovernorError::UnableToExtractKey => {
                Self::Internal("rate limiter could not determine the client address".to_string())
            }
            GovernorError::Other { code, msg, .. } => {
                Self::Internal(format!("rate limiter error {code}: {}", msg.unwrap_or_default()))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error_type: String,
    pub error_message: String,
    pub error_causes: Vec<ErrorCause>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCause {
    pub error_message: String,
}

impl ErrorEnvelope {
    fn new(status: StatusCode, message: String, error_id: Uuid) -> Self {
        Self {
            error_type: status.as_u16().to_string(),
            error_message: message,
            error_causes: vec![ErrorCause {
                error_message: format!(
                    "Please contact us providing the following error ID '{error_id}'"
                ),
            }],
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Something went wrong".to_string(),
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::TooManyRequests { .. } => "Too many requests".to_string(),
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Forbidden(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_id = Uuid::new_v4();

        if status.is_server_error() {
            // Capture server errors to Sentry
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                error_id = %error_id,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(
                error = %self,
                error_id = %error_id,
                status = status.as_u16(),
                "Request rejected"
            );
        }

        let retry_after = match &self {
            Self::TooManyRequests { retry_after } => HeaderValue::from_str(&retry_after.to_string()).ok(),
            _ => None,
        };

        let envelope = ErrorEnvelope::new(status, self.public_message(), error_id);
        let mut response = (status, Json(envelope)).into_response();
        if let Some(value) = retry_after {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context to the resolved customer.
pub fn set_sentry_user(customer_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn envelope(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 9".to_string());
        assert_eq!(err.to_string(), "Not found: order 9");

        let err = AppError::Validation("firstName is required".to_string());
        assert_eq!(err.to_string(), "Validation failed: firstName is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(get_status(AppError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(get_status(AppError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(get_status(AppError::MethodNotAllowed), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            get_status(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("dup".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_identity_errors_map_to_one_convention() {
        assert_eq!(
            get_status(IdentityError::CustomerNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(IdentityError::Forbidden.into()), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_lookup_is_internal() {
        let err: AppError = ShapingError::MissingLookup {
            table: "currency",
            id: 3,
        }
        .into();
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let json = envelope(AppError::Forbidden("Not your address".to_string())).await;

        assert_eq!(json["errorType"], "403");
        assert_eq!(json["errorMessage"], "Not your address");
        let cause = json["errorCauses"][0]["errorMessage"].as_str().unwrap();
        assert!(cause.starts_with("Please contact us providing the following error ID '"));
        let id = cause.rsplit('\'').nth(1).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_errors_use_envelope() {
        let err = AppError::from(GovernorError::TooManyRequests {
            wait_time: 7,
            headers: None,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "7");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["errorType"], "429");
        assert_eq!(json["errorMessage"], "Too many requests");

        let json = envelope(GovernorError::UnableToExtractKey.into()).await;
        assert_eq!(json["errorType"], "500");
        assert_eq!(json["errorMessage"], "Something went wrong");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let json = envelope(AppError::Internal("no currency row with id 3".to_string())).await;
        assert_eq!(json["errorType"], "500");
        assert_eq!(json["errorMessage"], "Something went wrong");
    }
}
