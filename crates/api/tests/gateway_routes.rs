//! Black-box tests for the gateway's routing and auth-gate behavior.
//!
//! These exercise the router directly (no sockets) with a seeded session
//! store; nothing here talks to a live ERP.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use campusgate_api::app::{build_router, services::AppServices};
use campusgate_erp::{ErpClient, ErpConfig, ErpSession};
use campusgate_students::EnrollmentContext;

async fn app_with_services() -> (axum::Router, String, Arc<AppServices>) {
    let client = ErpClient::new(ErpConfig::new("http://127.0.0.1:1")).unwrap();
    let services = Arc::new(AppServices::new(Arc::new(client)));
    let key = services.sessions.insert(ErpSession::new("test-token")).await;
    (build_router(services.clone()), key, services)
}

async fn app_with_session() -> (axum::Router, String) {
    let (app, key, _) = app_with_services().await;
    (app, key)
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn get_with_cookie(path: &str, key: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, format!("idempiere_authenticated={key}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, key: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::COOKIE, format!("idempiere_authenticated={key}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app_with_session().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_page_is_public() {
    let (app, _) = app_with_session().await;
    let response = app.oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_api_request_gets_401() {
    let (app, _) = app_with_session().await;
    let response = app.oneshot(get("/api/students")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unauthenticated_page_request_redirects_to_login() {
    let (app, _) = app_with_session().await;
    let response = app.oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn authenticated_login_page_redirects_to_dashboard() {
    let (app, key) = app_with_session().await;
    let response = app.oneshot(get_with_cookie("/login", &key)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn stale_cookie_does_not_authenticate() {
    let (app, _) = app_with_session().await;
    let response = app
        .oneshot(get_with_cookie("/api/students", "no-such-session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn screen_config_is_served_per_entity() {
    let (app, key) = app_with_session().await;
    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/screens/invoices", &key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "document");

    let response = app
        .oneshot(get_with_cookie("/api/screens/unknown", &key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn enrollment_flow_starts_reports_and_cancels_locally() {
    let (app, key) = app_with_session().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/students/enrollment",
            &key,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["step"], "basic_info");
    let flow = json["flow"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_with_cookie(
            &format!("/api/students/enrollment/{flow}"),
            &key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["context"]["current"], "basic_info");

    // Cancel drops the local context without any remote calls.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/students/enrollment/{flow}"))
                .header(header::COOKIE, format!("idempiere_authenticated={key}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_with_cookie(
            &format!("/api/students/enrollment/{flow}"),
            &key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn finishing_the_last_step_discards_the_flow_as_complete() {
    let (app, key, services) = app_with_services().await;

    // A flow that completed all four steps and then stepped back to the
    // role step: every id is recorded, so re-advancing needs no remote
    // call (the ERP client points at an unreachable address).
    let flow = services.flows.create().await;
    let context: EnrollmentContext = serde_json::from_value(serde_json::json!({
        "current": "role",
        "business_partner_id": 1000001,
        "location_id": 2000001,
        "user_id": 3000001,
        "role_assigned": true,
    }))
    .unwrap();
    services.flows.set(flow, context).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/students/enrollment/{flow}/advance"),
            &key,
            serde_json::json!({ "step": "role", "role_id": 102 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["complete"], true);
    assert_eq!(json["context"]["current"], "complete");

    // Completion drops the flow outright; it is not an abandoned cancel.
    assert!(services.flows.get(&flow).await.is_none());
    let response = app
        .oneshot(get_with_cookie(
            &format!("/api/students/enrollment/{flow}"),
            &key,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_step_input_is_rejected_before_any_remote_call() {
    let (app, key) = app_with_session().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/students/enrollment",
            &key,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    let flow = body_json(response).await["flow"].as_str().unwrap().to_string();

    // Empty student code: schema failure, so the unreachable ERP client is
    // never contacted and we get a 400 (not a 502).
    let response = app
        .oneshot(post_json(
            &format!("/api/students/enrollment/{flow}/advance"),
            &key,
            serde_json::json!({
                "step": "basic_info",
                "value": "",
                "name": "John",
                "bp_group_id": 1,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["fields"][0]["field"], "value");
}

#[tokio::test]
async fn unknown_doc_action_is_rejected_without_touching_the_erp() {
    let (app, key) = app_with_session().await;
    let response = app
        .oneshot(post_json(
            "/api/invoices/42/action",
            &key,
            serde_json::json!({ "action": "shred" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (app, key) = app_with_session().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/auth/logout", &key, serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    let response = app
        .oneshot(get_with_cookie("/api/students", &key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
