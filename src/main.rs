use std::sync::Arc;

use anyhow::Context;

use gym_gate::auth::TokenGate;
use gym_gate::config::Settings;
use gym_gate::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(&settings);

    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        "Starting server"
    );

    let gate = TokenGate::from_settings(&settings).context("Invalid token gate settings")?;
    if settings.jwt_secret_key.is_none() {
        tracing::warn!("JWT_SECRET_KEY not set; token signatures are not verified");
    }
    tracing::info!(mode = gate.mode(), "Token gate ready");

    let addr = format!("{}:{}", settings.host, settings.port);
    let app = build_router(Arc::new(AppState::new(settings, gate)));

    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let output = match settings.log_format.as_str() {
        "json" => fmt::layer().json().with_current_span(true).boxed(),
        _ => fmt::layer().with_target(true).boxed(),
    };

    tracing_subscriber::registry().with(output).with(filter).init();
}
