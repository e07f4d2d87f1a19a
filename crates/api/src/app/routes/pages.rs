//! Page endpoints the auth gate redirects between.
//!
//! The dashboard frontend renders these; the gateway only answers with
//! enough JSON for smoke checks and the redirect targets to exist.

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::context::SessionContext;

pub async fn login() -> impl IntoResponse {
    Json(serde_json::json!({ "page": "login" }))
}

pub async fn dashboard(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "page": "dashboard",
        "erp_user_id": session.erp().user_id.map(|id| id.get()),
    }))
}
