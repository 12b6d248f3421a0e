//! Shelfscan Server - profile store for library sync

use anyhow::{Context, Result};
use shelfscan_server::{routes, state};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfscan_server=debug,shelfscan_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = state::AppState::new().await?;
    tracing::info!(path = %state.storage_path.display(), "Using profile storage");

    let app = routes::create_router(state);

    let addr: SocketAddr = std::env::var("SHELFSCAN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .context("SHELFSCAN_ADDR is not a socket address")?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
