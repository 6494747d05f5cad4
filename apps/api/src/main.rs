mod config;
mod errors;
mod history;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;
mod transcript;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting interview trainer API v{}",
        env!("CARGO_PKG_VERSION")
    );
    if config.anthropic_api_key.is_some() {
        info!("LLM client configured (model: {})", llm_client::MODEL);
    } else {
        info!("No ANTHROPIC_API_KEY set, questions come from the static bank");
    }

    let state = AppState::new(config.clone());
    info!("History store at {}", config.history_path);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // single-user local tool, no auth

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
