use axum::{routing::get, Router};

pub mod assets;
pub mod auth;
pub mod invoices;
pub mod pages;
pub mod payments;
pub mod screens;
pub mod students;
pub mod system;

/// Router for the whole gateway. The auth gate layered on top decides
/// which of these paths are reachable without a session.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/login", get(pages::login))
        .route("/dashboard", get(pages::dashboard))
        .nest("/api/auth", auth::router())
        .nest("/api/students", students::router())
        .nest("/api/invoices", invoices::router())
        .nest("/api/payments", payments::router())
        .nest("/api/assets", assets::router())
        .nest("/api/screens", screens::router())
}
