mod routes;
mod singleton;
mod state;

use anyhow::{Context, Result};
use jobcal_core::{JobcalConfig, SyncCoordinator};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,jobcal_core=debug")),
        )
        .init();

    let config = JobcalConfig::load().context("Failed to load config")?;
    let data_dir = config.data_dir()?;

    // Ensure only one instance writes to this data directory
    let _lock = singleton::acquire_lock(&data_dir)?;

    let coordinator = SyncCoordinator::from_config(&config)?;
    let state = AppState::new(coordinator);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    tracing::info!(%addr, data_dir = %data_dir.display(), "jobcal-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
