use chrono::NaiveDateTime;
use serde::Serialize;

use crate::auth::Claims;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub uptime_seconds: u64,
    /// `decode-only` or `verify`.
    pub token_gate: &'static str,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub claims: Claims,
    pub expires_at: Option<NaiveDateTime>,
}
