use storefront_core::config::{AppConfig, ConfigError};
use storefront_db::{connect_with_settings, migrations, CatalogSeed, DbPool, RepositoryError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seed failed: {0}")]
    Seed(#[source] RepositoryError),
}

/// Connects, migrates and seeds the store. The server must not accept
/// requests before this returns.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let seed = CatalogSeed::ensure_seeded(&db_pool).await.map_err(BootstrapError::Seed)?;
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        products = seed.total,
        seeded = seed.seeded(),
        "catalog ready"
    );

    Ok(Application { config, db_pool })
}
