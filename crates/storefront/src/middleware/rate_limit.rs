//! Rate limiting middleware using governor and `tower_governor`.
//!
//! One limiter covers the API routes (1 request per second per client IP,
//! bursts of 50). Health checks are mounted outside it. Rejections are
//! rendered as [`AppError`] so clients get the usual error envelope.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::response::IntoResponse;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;

/// Key extractor that reads the client IP from the proxy chain, falling back
/// to the TCP peer address.
///
/// `X-Forwarded-For` is tried after `CF-Connecting-IP` and before the
/// single-value headers; only its first hop is used. Without any proxy header
/// the peer from `ConnectInfo` is the key.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        header_ip("cf-connecting-ip")
            .or_else(|| {
                headers
                    .get("x-forwarded-for")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.split(',').next())
                    .and_then(|s| s.trim().parse::<IpAddr>().ok())
            })
            .or_else(|| header_ip("x-real-ip"))
            .or_else(|| header_ip("fly-client-ip"))
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(peer)| peer.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// The governor builder rejected the limiter settings.
#[derive(Debug, thiserror::Error)]
#[error("invalid rate limiter configuration")]
pub struct RateLimitConfigError;

/// Create the API rate limiter: 1 token per second, burst of 50.
///
/// # Errors
///
/// Returns `RateLimitConfigError` if governor rejects the settings.
pub fn api_rate_limiter() -> Result<RateLimiterLayer, RateLimitConfigError> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(1)
        .burst_size(50)
        .finish()
        .ok_or(RateLimitConfigError)?;
    Ok(GovernorLayer::new(Arc::new(config))
        .error_handler(|err| AppError::from(err).into_response()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn extract(headers: &[(&str, &str)]) -> Option<IpAddr> {
        let mut builder = Request::builder();
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(()).ok()?;
        ProxyIpKeyExtractor.extract(&request).ok()
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let ip = extract(&[("x-forwarded-for", "10.0.0.1"), ("cf-connecting-ip", "203.0.113.7")]);
        assert_eq!(ip, "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let ip = extract(&[("x-forwarded-for", "198.51.100.2, 10.0.0.1")]);
        assert_eq!(ip, "198.51.100.2".parse().ok());
    }

    #[test]
    fn test_no_address_at_all() {
        assert_eq!(extract(&[]), None);
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 51000))));
        assert_eq!(
            ProxyIpKeyExtractor.extract(&request).ok(),
            "192.0.2.10".parse().ok()
        );
    }

    #[test]
    fn test_proxy_header_beats_peer_address() {
        let mut request = Request::builder()
            .header("x-real-ip", "198.51.100.9")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 2], 51000))));
        assert_eq!(
            ProxyIpKeyExtractor.extract(&request).ok(),
            "198.51.100.9".parse().ok()
        );
    }

    #[test]
    fn test_limiter_builds() {
        assert!(api_rate_limiter().is_ok());
    }
}
