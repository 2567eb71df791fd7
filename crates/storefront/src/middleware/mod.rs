//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (nosniff, frame denial, no-store on account data)
//! 5. Rate limiting (governor, applied by the binary)
//!
//! Caller identity is not a layer: handlers that need it take the
//! [`RequireIdentity`] or [`CurrentCustomer`] extractor.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{CurrentCustomer, RequireIdentity};
pub use rate_limit::{RateLimitConfigError, api_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
