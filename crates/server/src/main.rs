mod app;
mod bootstrap;
mod catalog;
mod health;

use std::time::Duration;

use anyhow::Result;
use storefront_core::config::{AppConfig, LoadOptions};
use tokio::sync::oneshot;

fn init_logging(config: &AppConfig) {
    use storefront_core::config::LogFormat::*;
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
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let address = app.config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    let router = app::build_router(app.db_pool.clone(), app.config.server.static_dir.as_deref());

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        static_dir = ?app.config.server.static_dir,
        "storefront-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = app.config.server.graceful_shutdown_secs,
        "storefront-server stopping"
    );
    let _ = stop_tx.send(());

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(error))) => {
            tracing::error!(
                event_name = "system.server.error",
                correlation_id = "shutdown",
                error = %error,
                "server terminated with an error"
            );
        }
        Ok(Err(error)) => {
            tracing::error!(
                event_name = "system.server.error",
                correlation_id = "shutdown",
                error = %error,
                "server task panicked"
            );
        }
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                "in-flight requests did not drain before the grace period elapsed"
            );
        }
    }

    app.db_pool.close().await;
    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "storefront-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
