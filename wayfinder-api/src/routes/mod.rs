use std::net::SocketAddr;

use axum::http::HeaderMap;

pub mod accounts;
pub mod health;
pub mod moderation;
pub mod places;
pub mod reviews;

/// Best-effort client address for rate-limit keys: first hop of
/// `X-Forwarded-For` when present (the usual reverse-proxy deployment),
/// otherwise the socket peer.
pub(crate) fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}
