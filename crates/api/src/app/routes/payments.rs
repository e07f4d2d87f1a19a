//! Payment list/detail screens and document workflow actions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use campusgate_core::PaymentId;
use campusgate_records::EntityScreen;

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_payments))
        .route("/:id", get(get_payment))
        .route("/:id/action", post(payment_action))
}

pub async fn list_payments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services
        .erp
        .list_payments(session.erp(), &params.into_query())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(page))).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn get_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = match PaymentId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    match services.erp.get_payment(session.erp(), id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn payment_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<dto::DocActionRequest>,
) -> axum::response::Response {
    let id = match PaymentId::from_raw(id) {
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

    let screen = EntityScreen::for_payments();
    if !screen.offers(action) {
        return errors::json_error(
            StatusCode::CONFLICT,
            "action_not_offered",
            "payments do not offer this action",
        );
    }

    let current = match services.erp.get_payment(session.erp(), id).await {
        Ok(payment) => payment,
        Err(e) => return errors::erp_error_to_response(e),
    };
    if !action.allowed_from(current.doc_status) {
        return errors::json_error(
            StatusCode::CONFLICT,
            "action_not_allowed",
            format!(
                "cannot {} a payment in status {}",
                body.action,
                current.doc_status.label()
            ),
        );
    }

    match services.erp.payment_action(session.erp(), id, action).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}
