//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state (ERP client, session store, flow store)
//! - `routes/`: HTTP routes + handlers (one file per screen area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use campusgate_erp::ErpClient;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(client: Arc<ErpClient>) -> Router {
    build_router(Arc::new(services::AppServices::new(client)))
}

/// Router over explicit services; split out so tests can seed sessions.
pub fn build_router(services: Arc<services::AppServices>) -> Router {
    let gate = middleware::GateState {
        sessions: services.sessions.clone(),
    };

    routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            gate,
            middleware::auth_gate,
        ))
}
