//! Invoice list/detail screens and document workflow actions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campusgate_core::InvoiceId;
use campusgate_records::EntityScreen;

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/action", post(invoice_action))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services
        .erp
        .list_invoices(session.erp(), &params.into_query())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(page))).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = match InvoiceId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    match services.erp.get_invoice(session.erp(), id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

/// Run a workflow action, but only one the invoice screen offers and the
/// document's current status allows.
pub async fn invoice_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<dto::DocActionRequest>,
) -> axum::response::Response {
    let id = match InvoiceId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    let Some(action) = body.parse() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_action",
            format!("unknown action: {}", body.action),
        );
    };

    let screen = EntityScreen::for_invoices();
    if !screen.offers(action) {
        return errors::json_error(
            StatusCode::CONFLICT,
            "action_not_offered",
            "invoices do not offer this action",
        );
    }

    let current = match services.erp.get_invoice(session.erp(), id).await {
        Ok(invoice) => invoice,
        Err(e) => return errors::erp_error_to_response(e),
    };
    if !action.allowed_from(current.doc_status) {
        return errors::json_error(
            StatusCode::CONFLICT,
            "action_not_allowed",
            format!(
                "cannot {} an invoice in status {}",
                body.action,
                current.doc_status.label()
            ),
        );
    }

    match services.erp.invoice_action(session.erp(), id, action).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}
