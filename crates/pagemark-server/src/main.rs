//! Pagemark reference backend.
//!
//! Stores uploaded PDFs on disk, serves them back under `/uploaded_files`,
//! and keeps documents, annotations and the document-type taxonomy in memory.

mod catalog;
mod config;
mod error;
mod routes;
mod seed;

use catalog::Catalog;
use config::ServerConfig;
use routes::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagemark_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tokio::fs::create_dir_all(&config.upload_folder).await?;

    let state = Arc::new(AppState {
        catalog: Catalog::seeded(),
        upload_folder: config.upload_folder.clone(),
    });
    let app = routes::router(state);

    tracing::info!("Starting Pagemark server on {}", config.addr);
    tracing::info!("Serving uploads from {}", config.upload_folder.display());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
