pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower_http::cors::{AllowMethods, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use auth::TokenGate;
use config::Settings;

pub struct AppState {
    pub settings: Settings,
    pub start_time: Instant,
    pub gate: Arc<TokenGate>,
}

impl AppState {
    pub fn new(settings: Settings, gate: TokenGate) -> Self {
        Self {
            settings,
            start_time: Instant::now(),
            gate: Arc::new(gate),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    use routes::{health, me};

    let protected = Router::new()
        .route("/api/v1/me", get(me::me))
        .route_layer(middleware::TokenGateLayer::new(state.gate.clone()));

    let cors = build_cors(&state.settings);

    Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Protected
        .merge(protected)
        .fallback(routes::fallback)
        .layer(axum::middleware::from_fn(middleware::request_log))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Methods are mirrored from the preflight, so the allow list never drifts
/// from what the router serves. Only the origins come from `CORS_ORIGINS`.
fn build_cors(settings: &Settings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    match settings.cors_origins_list().as_slice() {
        [only] if only == "*" => cors.allow_origin(Any),
        origins => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(allowed).allow_credentials(true)
        }
    }
}
