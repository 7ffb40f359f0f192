mod config;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::layout::{default_layout_config, StandardFonts};
use crate::render::{DocumentAssembler, LopdfBackend};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.export_dir).with_context(|| {
        format!("Failed to create export directory {}", config.export_dir.display())
    })?;
    info!("Exports directory: {}", config.export_dir.display());

    // Layout policy and measurer share one font family with the PDF backend.
    let layout_config = default_layout_config(config.layout_font);
    info!(
        "Layout config: {:?}, {}pt body on a {}pt line",
        layout_config.font, layout_config.type_scale.body, layout_config.spacing.line_height
    );
    let assembler = DocumentAssembler::new(
        layout_config,
        Arc::new(StandardFonts::new(config.layout_font)),
        Arc::new(LopdfBackend::new(config.layout_font, config.pdf_compress)),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        assembler,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
