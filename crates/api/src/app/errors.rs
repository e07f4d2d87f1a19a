//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campusgate_erp::ErpError;
use campusgate_forms::FieldErrors;
use campusgate_students::EnrollmentError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Field-level validation failure: 400 with the failing fields listed.
pub fn field_errors_to_response(errors: &FieldErrors) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": errors.to_string(),
            "fields": errors.errors(),
        })),
    )
        .into_response()
}

/// Adapter failures: auth maps to 401, ERP business rejections to 422,
/// everything transport-shaped to 502.
pub fn erp_error_to_response(err: ErpError) -> axum::response::Response {
    match err {
        ErpError::Auth(msg) => json_error(StatusCode::UNAUTHORIZED, "erp_auth", msg),
        ErpError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        ErpError::Server { status, message } if (400..500).contains(&status) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "erp_rejected", message)
        }
        ErpError::Server { message, .. } => {
            json_error(StatusCode::BAD_GATEWAY, "erp_error", message)
        }
        ErpError::Network(e) => {
            json_error(StatusCode::BAD_GATEWAY, "erp_unreachable", e.to_string())
        }
        ErpError::Decode(msg) => json_error(StatusCode::BAD_GATEWAY, "erp_decode_error", msg),
        ErpError::Config(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg)
        }
    }
}

/// Workflow failures carry the step that failed so the UI can highlight it.
pub fn enrollment_error_to_response(
    err: EnrollmentError<ErpError>,
) -> axum::response::Response {
    match err {
        EnrollmentError::Validation { step, errors } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "step": step.label(),
                "message": errors.to_string(),
                "fields": errors.errors(),
            })),
        )
            .into_response(),
        EnrollmentError::Remote { step, source } => (
            StatusCode::BAD_GATEWAY,
            axum::Json(json!({
                "error": "step_failed",
                "step": step.label(),
                "message": source.to_string(),
            })),
        )
            .into_response(),
        EnrollmentError::OutOfOrder { expected, got } => json_error(
            StatusCode::CONFLICT,
            "out_of_order",
            format!("expected input for step {expected}, got {got}"),
        ),
        EnrollmentError::AlreadyComplete => json_error(
            StatusCode::CONFLICT,
            "already_complete",
            "enrollment already complete",
        ),
    }
}
