use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs each request on the way in and its response on the way out.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();

    tracing::info!(%method, %path, %request_id, "Request received");

    let started = Instant::now();
    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        %request_id,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "Response sent"
    );

    response
}
