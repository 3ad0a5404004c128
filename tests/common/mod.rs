#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::json;
use tower::ServiceExt;

use gym_gate::auth::{TokenGate, TokenPolicy};
use gym_gate::config::Settings;
use gym_gate::{AppState, build_router};

/// Router with a decode-only gate, as the server runs without JWT_SECRET_KEY.
pub fn app() -> Router {
    app_with_gate(TokenGate::new(TokenPolicy::DecodeOnly))
}

pub fn app_with_gate(gate: TokenGate) -> Router {
    build_router(Arc::new(AppState::new(Settings::default(), gate)))
}

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Encode bytes as base64url (no padding).
fn b64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Create a structurally valid JWT with a dummy signature. The decode-only
/// gate never looks at the signature.
pub fn encode_jwt(payload: &serde_json::Value) -> String {
    let header = json!({"typ": "JWT", "alg": "HS256"});
    let header_b64 = b64url(header.to_string().as_bytes());
    let payload_b64 = b64url(payload.to_string().as_bytes());
    let signature_b64 = b64url(b"dummy_signature");
    format!("{header_b64}.{payload_b64}.{signature_b64}")
}

/// Assemble `<header>.<payload><tail>` by hand, for tokens no issuer library
/// would produce.
pub fn encode_raw(header: &serde_json::Value, payload: &serde_json::Value, tail: &str) -> String {
    let header_b64 = b64url(header.to_string().as_bytes());
    let payload_b64 = b64url(payload.to_string().as_bytes());
    format!("{header_b64}.{payload_b64}{tail}")
}

/// `Bearer <token>` for a member token valid for ten more minutes.
pub fn auth_header(id: i64, email: &str) -> String {
    let payload = json!({"id": id, "email": email, "exp": now_secs() + 600});
    format!("Bearer {}", encode_jwt(&payload))
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

pub async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
