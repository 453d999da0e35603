use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "wayfinder_session";
const SESSION_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Per-browser session identity, carried in a cookie.
///
/// This is the explicit session context the anti-spam state (CAPTCHA flags,
/// guest reviewed-places set) is keyed on. The middleware guarantees every
/// request carries one: existing cookies are reused, everything else gets a
/// fresh id plus a `Set-Cookie` on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub async fn session_middleware(mut req: Request<Body>, next: Next) -> Response {
    let existing = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_session_cookie);

    let (session_id, is_new) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    req.extensions_mut().insert(SessionId(session_id));
    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!(
            "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_COOKIE_MAX_AGE_SECS}"
        );
        if let Ok(value) = cookie.parse() {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn parse_session_cookie(raw: &str) -> Option<Uuid> {
    raw.split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or_else(|| AppError::internal("session middleware not installed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_cookie_among_others() {
        let id = Uuid::new_v4();
        let raw = format!("theme=dark; {SESSION_COOKIE}={id}; lang=en");
        assert_eq!(parse_session_cookie(&raw), Some(id));
    }

    #[test]
    fn rejects_malformed_cookie_values() {
        assert_eq!(parse_session_cookie("wayfinder_session=not-a-uuid"), None);
        assert_eq!(parse_session_cookie("other=value"), None);
        assert_eq!(parse_session_cookie(""), None);
    }
}
