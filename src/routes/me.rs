use axum::Json;
use chrono::DateTime;

use crate::middleware::Authenticated;
use crate::models::responses::MeResponse;

/// Echoes the caller's decoded claims.
pub async fn me(Authenticated(claims): Authenticated) -> Json<MeResponse> {
    let expires_at = DateTime::from_timestamp(claims.exp, 0).map(|t| t.naive_utc());
    Json(MeResponse { claims, expires_at })
}
