//! Correlation ids for requests.
//!
//! A gateway-supplied `x-request-id` is kept when it looks like an id (short,
//! visible ASCII); anything else is replaced by a fresh UUID v4. The id is put
//! in the request extensions as [`RequestId`], recorded on the request span,
//! tagged on the Sentry scope and echoed back in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id that is reused as-is.
const MAX_UPSTREAM_LEN: usize = 128;

/// Correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse `upstream` if it is a plausible id, otherwise generate one.
    #[must_use]
    pub fn from_upstream(upstream: Option<&HeaderValue>) -> Self {
        upstream
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.len() <= MAX_UPSTREAM_LEN)
            .filter(|s| s.bytes().all(|b| b.is_ascii_graphic()))
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |s| Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assign a [`RequestId`] and echo it in the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_upstream(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let header = HeaderValue::from_str(request_id.as_str()).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn upstream(value: &str) -> RequestId {
        RequestId::from_upstream(Some(&HeaderValue::from_str(value).unwrap()))
    }

    #[test]
    fn test_reuses_upstream_id() {
        assert_eq!(upstream("cf-7a1b2c").as_str(), "cf-7a1b2c");
        assert_eq!(upstream("  gw-1 ").as_str(), "gw-1");
    }

    #[test]
    fn test_generates_when_missing() {
        let id = RequestId::from_upstream(None);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_replaces_implausible_ids() {
        for bad in ["", "   ", "has space", &"x".repeat(MAX_UPSTREAM_LEN + 1)] {
            let id = upstream(bad);
            assert!(Uuid::parse_str(id.as_str()).is_ok(), "{bad:?}");
        }
    }
}
