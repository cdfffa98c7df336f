use crate::commands::{open_migrated_pool, run_with_config, CommandResult, StepFailure};

pub fn run() -> CommandResult {
    let result = run_with_config("migrate", |config| async move {
        let pool = open_migrated_pool(&config).await?;
        pool.close().await;
        Ok::<(), StepFailure>(())
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(failure) => failure,
    }
}
