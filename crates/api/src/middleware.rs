//! Request-level authentication gate.
//!
//! Access is decided solely by the `idempiere_authenticated` cookie:
//! unauthenticated requests to protected paths are turned away (401 for
//! API paths, a redirect to `/login` for page paths), and authenticated
//! requests to the public auth paths are sent on to `/dashboard`.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::app::services::SessionStore;
use crate::context::SessionContext;

/// Name of the authentication cookie holding the opaque session key.
pub const AUTH_COOKIE: &str = "idempiere_authenticated";

#[derive(Clone)]
pub struct GateState {
    pub sessions: SessionStore,
}

/// Paths reachable without a session.
fn is_public(path: &str) -> bool {
    matches!(path, "/health" | "/login" | "/api/auth/login")
}

/// Public auth pages an authenticated user gets redirected away from.
fn is_auth_page(path: &str) -> bool {
    path == "/login"
}

pub async fn auth_gate(
    State(state): State<GateState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    let session = match cookie_value(req.headers(), AUTH_COOKIE) {
        Some(key) => state
            .sessions
            .get(&key)
            .await
            .map(|erp| SessionContext::new(key, erp)),
        None => None,
    };

    match session {
        Some(ctx) => {
            if is_auth_page(&path) {
                return Redirect::to("/dashboard").into_response();
            }
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        None => {
            if is_public(&path) {
                return next.run(req).await;
            }
            if path.starts_with("/api/") {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "error": "unauthenticated",
                        "message": "log in first",
                    })),
                )
                    .into_response();
            }
            Redirect::to("/login").into_response()
        }
    }
}

/// Pull a single cookie's value out of the `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        if k == name && !v.is_empty() {
            Some(v.to_string())
        } else {
            None
        }
    })
}

/// `Set-Cookie` value establishing the session cookie.
pub fn session_cookie(key: &str) -> String {
    format!("{AUTH_COOKIE}={key}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; idempiere_authenticated=abc123; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, AUTH_COOKIE).as_deref(),
            Some("abc123")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("idempiere_authenticated="),
        );
        assert_eq!(cookie_value(&headers, AUTH_COOKIE), None);
    }
}
