//! Per-client admission control middleware.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// Rate-limit key for a request.
///
/// With `behind_proxy` the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`. Otherwise, or when neither header is usable, the peer socket
/// address is used. Only enable `behind_proxy` behind a trusted reverse proxy:
/// the headers are client-controlled.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = real_ip {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rejects requests from clients whose bucket is empty with
/// `429 Too Many Requests`.
///
/// Runs before authentication, so unauthenticated floods are throttled too.
/// When the limiter is disabled every request passes straight through.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    if !st.rate_limiter.config().enabled {
        return next.run(req).await;
    }

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(req.headers(), peer, st.behind_proxy);

    if !st.rate_limiter.allow(&key) {
        debug!(client = %key, "Rate limit exceeded");
        metrics::counter!("http_requests_rate_limited_total").increment(1);
        return AppError::rate_limited().into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.7:51234".parse().unwrap())
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));

        assert_eq!(client_key(&headers, peer(), false), "10.0.0.7");
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_key(&headers, peer(), true), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_key(&headers, peer(), true), "198.51.100.2");
    }

    #[test]
    fn test_unknown_without_peer_or_headers() {
        assert_eq!(client_key(&HeaderMap::new(), None, true), "unknown");
    }
}
