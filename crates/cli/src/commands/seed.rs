use storefront_db::{CatalogSeed, SeedOutcome};

use crate::commands::{open_migrated_pool, run_with_config, CommandResult, StepFailure, EXIT_SEED};

pub fn run() -> CommandResult {
    let result = run_with_config("seed", |config| async move {
        let pool = open_migrated_pool(&config).await?;

        let outcome = CatalogSeed::ensure_seeded(&pool)
            .await
            .map_err(|error| StepFailure::new("seed_execution", error.to_string(), EXIT_SEED));
        let missing = match &outcome {
            Ok(outcome) if outcome.seeded() => {
                CatalogSeed::missing_products(&pool).await.map_err(|error| {
                    StepFailure::new("seed_verification", error.to_string(), EXIT_SEED)
                })
            }
            _ => Ok(Vec::new()),
        };

        pool.close().await;

        let outcome = outcome?;
        let missing = missing?;
        if !missing.is_empty() {
            return Err(StepFailure::new(
                "seed_verification",
                verification_message(&missing),
                EXIT_SEED,
            ));
        }
        Ok::<SeedOutcome, StepFailure>(outcome)
    });

    match result {
        Ok(outcome) => CommandResult::success("seed", summary(&outcome)),
        Err(failure) => failure,
    }
}

fn summary(outcome: &SeedOutcome) -> String {
    if outcome.seeded() {
        format!("inserted {} catalog products", outcome.inserted)
    } else {
        format!("catalog already holds {} products; nothing inserted", outcome.total)
    }
}

fn verification_message(missing: &[&str]) -> String {
    format!("seed verification failed; missing products: {}", missing.join(", "))
}
