use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use certfit::config::Config;
use certfit::routes::build_router;
use certfit::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed env values fail startup before anything is bound
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting certfit v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(&config);
    info!(
        min_font_size = state.defaults.min_font_size,
        truncate_overflow = state.defaults.truncate_overflow,
        height_fallback = ?state.defaults.height_fallback,
        "Fit policy defaults loaded"
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
