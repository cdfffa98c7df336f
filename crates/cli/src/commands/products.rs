use storefront_db::{ProductRepository, SqlProductRepository};

use crate::commands::{
    open_migrated_pool, run_with_config, CommandResult, StepFailure, EXIT_RUNTIME,
};

/// Prints the stored catalog as the JSON array `GET /api/products` serves.
pub fn run() -> CommandResult {
    let result = run_with_config("products", |config| async move {
        let pool = open_migrated_pool(&config).await?;
        let products = SqlProductRepository::new(pool.clone()).list_all().await;
        pool.close().await;

        let products = products
            .map_err(|error| StepFailure::new("catalog_read", error.to_string(), EXIT_RUNTIME))?;
        serde_json::to_string_pretty(&products).map_err(|error| {
            StepFailure::new("serialization", error.to_string(), EXIT_RUNTIME)
        })
    });

    match result {
        Ok(listing) => CommandResult { exit_code: 0, output: listing },
        Err(failure) => failure,
    }
}
