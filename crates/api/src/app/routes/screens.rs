//! Screen configuration endpoint: the tagged action/table config the
//! dashboard uses to render each entity's list screen.

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campusgate_records::EntityScreen;

use crate::app::errors;

pub fn router() -> Router {
    Router::new().route("/:entity", get(get_screen))
}

pub async fn get_screen(Path(entity): Path<String>) -> axum::response::Response {
    let screen = match entity.as_str() {
        "students" => EntityScreen::for_students(),
        "invoices" => EntityScreen::for_invoices(),
        "payments" => EntityScreen::for_payments(),
        "assets" => EntityScreen::for_assets(),
        _ => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "unknown_entity",
                format!("no screen configured for {entity}"),
            )
        }
    };
    (StatusCode::OK, Json(screen)).into_response()
}
