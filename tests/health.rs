mod common;

use axum::http::StatusCode;

use common::{app, get, json_body, send};

#[tokio::test]
async fn test_root_endpoint() {
    let resp = send(app(), get("/", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let data = json_body(resp).await;
    assert_eq!(data["service"], "Gym Gate API");
    assert_eq!(data["version"], "1.0.0");
    assert_eq!(data["status"], "running");
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let resp = send(app(), get("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let data = json_body(resp).await;
    assert_eq!(data["status"], "healthy");
    assert_eq!(data["token_gate"], "decode-only");
    assert!(data["uptime_seconds"].is_number());
    assert!(data["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let resp = send(app(), get("/health", None)).await;
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let resp = send(app(), get("/api/v1/nope", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "not_found");
}
