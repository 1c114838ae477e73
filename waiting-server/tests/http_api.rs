//! HTTP 接口测试 - 完整路由 + 中间件，oneshot 请求

mod common;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{MIN, VENUE, memory_state};
use waiting_server::Server;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn staff(path: &str) -> String {
    format!("/api/venues/{VENUE}{path}")
}

fn public(path: &str) -> String {
    format!("/api/public/venues/{VENUE}/waiting{path}")
}

async fn open(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::PUT,
        &staff("/waiting-settings/operation-status"),
        Some(json!({ "operation_status": "ACCEPTING" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["operation_status"], "ACCEPTING");

    let (_, types) = send(app, Method::GET, &staff("/waiting-types"), None).await;
    types["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["failed_tasks"], 0);
}

#[tokio::test]
async fn health_reports_exited_background_task() {
    let (state, _clock) = memory_state();
    state.tasks.lock().spawn("flaky_listener", async {
        panic!("listener lost its channel");
    });
    let app = Server::router(state);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["background_tasks"], 1);
    assert_eq!(body["failed_tasks"], 1);
}

#[tokio::test]
async fn malformed_body_uses_error_envelope() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);

    let request = Request::builder()
        .method(Method::POST)
        .uri(public("/register"))
        .header("content-type", "application/json")
        .body(Body::from(r#"{"party_size": "#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 5);

    // Missing content type is rejected the same way
    let request = Request::builder()
        .method(Method::PUT)
        .uri(staff("/waiting-settings"))
        .body(Body::from(r#"{"call_timeout_minutes": 10}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn closed_venue_rejects_public_registration() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);

    let (status, body) = send(
        &app,
        Method::POST,
        &public("/register"),
        Some(json!({ "waiting_type_id": "any", "party_size": 2, "phone": "010-1234-5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn customer_and_staff_flow() {
    let (state, clock) = memory_state();
    let app = Server::router(state);
    let type_id = open(&app).await;

    // customer registers by QR
    let (status, body) = send(
        &app,
        Method::POST,
        &public("/register"),
        Some(json!({ "waiting_type_id": type_id, "party_size": 2, "phone": "010-1234-5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["sequence_number"], 1);
    assert_eq!(body["data"]["source"], "QR");
    assert_eq!(body["data"]["position"], 1);
    let ticket_id = body["data"]["id"].as_str().unwrap().to_string();

    // same phone again
    let (status, body) = send(
        &app,
        Method::POST,
        &public("/register"),
        Some(json!({ "waiting_type_id": type_id, "party_size": 2, "phone": "01012345678" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5006);

    let (status, body) = send(
        &app,
        Method::GET,
        &public("/status?phone=01012345678"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "WAITING");
    assert_eq!(body["data"]["estimated_wait_minutes"], 0);

    // staff calls
    let (status, body) = send(&app, Method::POST, &staff(&format!("/waiting/{ticket_id}/call")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CALLED");
    assert_eq!(body["data"]["called_count"], 1);

    // calling again is not allowed, recall is
    let (status, body) = send(&app, Method::POST, &staff(&format!("/waiting/{ticket_id}/call")), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);

    clock.advance_millis(MIN);
    let (_, snapshot) = send(&app, Method::GET, &staff("/waiting"), None).await;
    let call = &snapshot["data"]["tickets"][0]["call"];
    assert_eq!(call["elapsed_seconds"], 60);
    assert_eq!(call["remaining_seconds"], 120);

    // AUTO_CANCELLED is system-only
    let (status, body) = send(
        &app,
        Method::POST,
        &staff(&format!("/waiting/{ticket_id}/cancel")),
        Some(json!({ "reason": "AUTO_CANCELLED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4006);

    let (status, body) = send(&app, Method::POST, &staff(&format!("/waiting/{ticket_id}/seat")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "SEATED");

    let (_, today) = send(&app, Method::GET, &staff("/waiting/stats/today"), None).await;
    assert_eq!(today["data"]["seated"], 1);

    // restore within the window
    let (status, body) = send(&app, Method::POST, &staff(&format!("/waiting/{ticket_id}/restore")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "WAITING");

    // customer cancels by phone
    let (status, body) = send(
        &app,
        Method::POST,
        &public("/cancel"),
        Some(json!({ "phone": "010-1234-5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cancel_reason"], "CUSTOMER_REQUEST");
}

#[tokio::test]
async fn memo_is_patched() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);
    let type_id = open(&app).await;

    let (_, body) = send(
        &app,
        Method::POST,
        &public("/register"),
        Some(json!({ "waiting_type_id": type_id, "party_size": 3, "phone": "010-5555-0101" })),
    )
    .await;
    let ticket_id = body["data"]["id"].as_str().unwrap().to_string();
    let memo_uri = staff(&format!("/waiting/{ticket_id}/memo"));

    let (status, body) = send(&app, Method::PATCH, &memo_uri, Some(json!({ "memo": "window seat" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["memo"], "window seat");

    let (status, _) = send(&app, Method::PUT, &memo_uri, Some(json!({ "memo": "booth" }))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);
    open(&app).await;

    let (status, body) = send(&app, Method::POST, &staff("/waiting/missing/seat"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
    assert_eq!(body["details"]["ticket_id"], "missing");
}

#[tokio::test]
async fn waiting_type_management() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);
    let hall = open(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &staff("/waiting-types"),
        Some(json!({ "name": "Terrace", "max_party_size": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let terrace = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &staff("/waiting-types"),
        Some(json!({ "name": " Terrace " })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    let (status, body) = send(
        &app,
        Method::PUT,
        &staff("/waiting-types/reorder"),
        Some(json!({ "ids": [terrace, hall] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Terrace");

    // no tickets: really deleted
    let (status, body) = send(&app, Method::DELETE, &staff(&format!("/waiting-types/{terrace}")), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["result"], "deleted");

    // last active type stays
    let (status, body) = send(&app, Method::DELETE, &staff(&format!("/waiting-types/{hall}")), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);
}

#[tokio::test]
async fn settings_out_of_range_rejected() {
    let (state, _clock) = memory_state();
    let app = Server::router(state);

    let (status, body) = send(&app, Method::GET, &staff("/waiting-settings"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["operation_status"], "CLOSED");

    let (status, _) = send(
        &app,
        Method::PUT,
        &staff("/waiting-settings"),
        Some(json!({ "call_timeout_minutes": 31 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &staff("/waiting-settings"),
        Some(json!({ "call_timeout_minutes": 10, "waiting_note": "Please wait outside" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["call_timeout_minutes"], 10);

    let (_, info) = send(&app, Method::GET, &public("/info"), None).await;
    assert_eq!(info["data"]["waiting_note"], "Please wait outside");
}
