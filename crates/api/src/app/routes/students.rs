//! Student screens and the enrollment flow endpoints.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use campusgate_core::BusinessPartnerId;
use campusgate_erp::ErpEnrollmentGateway;
use campusgate_forms::{validate_basic_info_update, BasicInfoUpdateForm};
use campusgate_students::{advance, go_back, StepInput};

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_students))
        .route("/enrollment", post(start_enrollment))
        .route(
            "/enrollment/:flow",
            get(enrollment_status).delete(cancel_enrollment),
        )
        .route("/enrollment/:flow/advance", post(advance_enrollment))
        .route("/enrollment/:flow/back", post(back_enrollment))
        .route("/:id", get(get_student).patch(update_student))
        .route("/:id/deactivate", post(deactivate_student))
}

pub async fn list_students(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services
        .erp
        .list_students(session.erp(), &params.into_query())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(page))).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn get_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = match BusinessPartnerId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    match services.erp.get_business_partner(session.erp(), id).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

/// Single-step update flow: relaxed schema, then one adapter call.
pub async fn update_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<BasicInfoUpdateForm>,
) -> axum::response::Response {
    let id = match BusinessPartnerId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    let valid = match validate_basic_info_update(&body) {
        Ok(v) => v,
        Err(errors) => return errors::field_errors_to_response(&errors),
    };
    match services
        .erp
        .update_business_partner(session.erp(), id, &valid)
        .await
    {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn deactivate_student(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = match BusinessPartnerId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    match services
        .erp
        .deactivate_business_partner(session.erp(), id)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

// -------------------------
// Enrollment flow
// -------------------------

pub async fn start_enrollment(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let flow = services.flows.create().await;
    tracing::info!(%flow, "enrollment flow started");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "flow": flow, "step": "basic_info" })),
    )
        .into_response()
}

pub async fn enrollment_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(flow): Path<Uuid>,
) -> axum::response::Response {
    match services.flows.get(&flow).await {
        Some(context) => (
            StatusCode::OK,
            Json(serde_json::json!({ "flow": flow, "context": context })),
        )
            .into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "no_such_flow", "unknown flow"),
    }
}

/// Validate the current step's input and run its remote call. Failure
/// leaves the stored context untouched so the same step can be retried.
/// The flow entry stays locked across the remote call, so a second advance
/// for the same flow waits and then sees the updated state.
pub async fn advance_enrollment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(flow): Path<Uuid>,
    Json(input): Json<StepInput>,
) -> axum::response::Response {
    let Some(entry) = services.flows.entry(&flow).await else {
        return errors::json_error(StatusCode::NOT_FOUND, "no_such_flow", "unknown flow");
    };
    let mut guard = entry.lock().await;
    let context = guard.clone();

    let gateway = ErpEnrollmentGateway::new(services.erp.clone(), session.erp().clone());
    match advance(&gateway, &context, input).await {
        Ok(next) => {
            let complete = next.is_complete();
            *guard = next.clone();
            drop(guard);
            if complete {
                // Terminal on success: nothing left to reconcile.
                services.flows.remove(&flow).await;
            }
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "flow": flow,
                    "complete": complete,
                    "context": next,
                })),
            )
                .into_response()
        }
        Err(e) => errors::enrollment_error_to_response(e),
    }
}

pub async fn back_enrollment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(flow): Path<Uuid>,
) -> axum::response::Response {
    let Some(entry) = services.flows.entry(&flow).await else {
        return errors::json_error(StatusCode::NOT_FOUND, "no_such_flow", "unknown flow");
    };
    let mut guard = entry.lock().await;
    let previous = go_back(&guard);
    *guard = previous.clone();
    drop(guard);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "flow": flow, "context": previous })),
    )
        .into_response()
}

/// Explicit cancel: drops local state only. Records created by completed
/// steps stay in the ERP (logged by the flow store for reconciliation).
pub async fn cancel_enrollment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(flow): Path<Uuid>,
) -> axum::response::Response {
    match services.flows.cancel(&flow).await {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "no_such_flow", "unknown flow"),
    }
}
