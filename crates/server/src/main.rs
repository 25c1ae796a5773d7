mod bootstrap;
mod error;
mod health;
mod mapper;
mod routes;

use std::time::Duration;

use anyhow::Result;
use catalog_core::config::{AppConfig, LoadOptions};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::routes::ApiState;

fn init_logging(config: &AppConfig) {
    use catalog_core::config::LogFormat::*;
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

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging is configured from the loaded config, so load it first.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let router = routes::router(ApiState { catalog: app.catalog, categories: app.categories })
        .merge(health::router(app.db_pool.clone()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "catalog-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined??;
            app.db_pool.close().await;
            return Ok(());
        }
        signal = wait_for_shutdown() => signal?,
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = app.config.server.graceful_shutdown_secs,
        "catalog-server draining in-flight requests"
    );
    let _ = stop_tx.send(());

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "graceful shutdown window elapsed with requests still in flight"
        ),
    }

    app.db_pool.close().await;
    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "catalog-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
