//! Login/logout against the ERP's auth endpoint.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Exchange credentials for an ERP session and set the auth cookie.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let session = match services.erp.login(&body.username, &body.password).await {
        Ok(s) => s,
        Err(e) => return errors::erp_error_to_response(e),
    };

    let key = services.sessions.insert(session).await;
    tracing::info!(username = %body.username, "dashboard session established");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, middleware::session_cookie(&key))],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response()
}

/// Drop the server-side session and clear the cookie. Nothing to roll
/// back remotely; the ERP token simply stops being used.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    services.sessions.remove(session.key()).await;
    (
        StatusCode::OK,
        [(header::SET_COOKIE, middleware::clear_session_cookie())],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response()
}
