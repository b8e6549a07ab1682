mod config;
mod routes;
mod models;
mod gemini;
mod session;

use anyhow::Context;
use axum::{Router, routing::{post, get}};
use routes::{submit_brand_input, get_session_state, get_tone_presets, health, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use tower_http::cors::{CorsLayer, Any};

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!("Using API key: {}...", config::key_preview(&config.api_key));

    let state = AppState {
        session: Session::shared(),
        engine: Arc::new(GeminiClient::new(config.api_key.clone(), config.base_url.clone())),
    };

    let app = Router::new()
        .route("/api/brand", post(submit_brand_input))
        .route("/api/brand/state", get(get_session_state))
        .route("/api/brand/tones", get(get_tone_presets))
        .route("/api/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
