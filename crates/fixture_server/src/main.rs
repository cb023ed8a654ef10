use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod fixtures;

use api::{build_router, AppState};
use config::load_settings;
use fixtures::FixtureCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let catalog = FixtureCatalog::builtin();
    info!(leagues = ?catalog.league_ids(), latency_ms = settings.latency_ms, "fixtures loaded");

    let app = build_router(Arc::new(AppState {
        catalog,
        latency: settings.latency(),
    }));

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "fixture server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
