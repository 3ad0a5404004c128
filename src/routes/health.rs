use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::responses::HealthResponse;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        environment: state.settings.environment.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        token_gate: state.gate.mode(),
        timestamp: Utc::now().naive_utc(),
    })
}

pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.settings.app_name,
        "version": state.settings.app_version,
        "status": "running",
        "health": "/health",
    }))
}
