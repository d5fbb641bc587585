mod api;
mod bootstrap;
mod health;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use kihsa_core::catalog::CatalogSource;
use kihsa_core::config::{AppConfig, LoadOptions};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

fn init_logging(config: &AppConfig) {
    use kihsa_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

/// Storefront API plus health, with CORS open to any browser origin.
pub fn app(source: Arc<dyn CatalogSource>) -> Router {
    api::router(api::ApiState::new(source.clone()))
        .merge(health::router(source))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let application = bootstrap::bootstrap_with_config(config).await?;
    let server_config = &application.config.server;
    let address = format!("{}:{}", server_config.bind_address, server_config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        catalog_source = application.source.describe(),
        "kihsa-server listening"
    );

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app(application.source.clone()))
        .with_graceful_shutdown(async move {
            wait_for_shutdown().await;
            let _ = stop_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    let grace = Duration::from_secs(server_config.graceful_shutdown_secs);
    tokio::select! {
        result = &mut server => result?,
        _ = async {
            let _ = stop_rx.wait_for(|stopped| *stopped).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = server_config.graceful_shutdown_secs,
                "open connections outlived the shutdown window"
            );
        }
    }

    info!(event_name = "system.server.stopping", correlation_id = "shutdown", "kihsa-server stopping");
    if let Some(pool) = &application.db_pool {
        pool.close().await;
    }

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for ctrl-c; shutting down"
        );
    }
}
