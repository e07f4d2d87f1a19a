//! Asset list/detail screens (read-only master data).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use campusgate_core::AssetId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_assets))
        .route("/:id", get(get_asset))
}

pub async fn list_assets(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    match services
        .erp
        .list_assets(session.erp(), &params.into_query())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(dto::page_to_json(page))).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}

pub async fn get_asset(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    let id = match AssetId::from_raw(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    match services.erp.get_asset(session.erp(), id).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => errors::erp_error_to_response(e),
    }
}
