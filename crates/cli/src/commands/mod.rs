pub mod config;
pub mod doctor;
pub mod migrate;
pub mod products;
pub mod seed;

use serde::Serialize;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_db::{connect_with_settings, migrations, DbPool};
use tokio::runtime::Runtime;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_CONNECT: u8 = 4;
pub const EXIT_MIGRATE: u8 = 5;
pub const EXIT_SEED: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn from_step(command: &str, failure: StepFailure) -> Self {
        Self::failure(command, failure.error_class, failure.message, failure.exit_code)
    }
}

/// A failed command step, carried until the command renders its payload.
#[derive(Debug)]
pub(crate) struct StepFailure {
    pub error_class: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl StepFailure {
    pub(crate) fn new(error_class: &'static str, message: impl Into<String>, exit_code: u8) -> Self {
        Self { error_class, message: message.into(), exit_code }
    }
}

pub(crate) fn load_config() -> Result<AppConfig, StepFailure> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        StepFailure::new("config_validation", format!("configuration issue: {error}"), EXIT_CONFIG)
    })
}

pub(crate) fn build_runtime() -> Result<Runtime, StepFailure> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        StepFailure::new(
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        )
    })
}

pub(crate) async fn open_migrated_pool(config: &AppConfig) -> Result<DbPool, StepFailure> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| StepFailure::new("db_connectivity", error.to_string(), EXIT_CONNECT))?;

    if let Err(error) = migrations::run_pending(&pool).await {
        pool.close().await;
        return Err(StepFailure::new("migration", error.to_string(), EXIT_MIGRATE));
    }

    Ok(pool)
}

/// Loads config, then runs `step` on a fresh current-thread runtime.
pub(crate) fn run_with_config<T, F, Fut>(command: &str, step: F) -> Result<T, CommandResult>
where
    F: FnOnce(AppConfig) -> Fut,
    Fut: std::future::Future<Output = Result<T, StepFailure>>,
{
    let config = load_config().map_err(|failure| CommandResult::from_step(command, failure))?;
    let runtime = build_runtime().map_err(|failure| CommandResult::from_step(command, failure))?;
    runtime.block_on(step(config)).map_err(|failure| CommandResult::from_step(command, failure))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::CommandResult;

    #[test]
    fn failure_payload_carries_class_and_exit_code() {
        let result = CommandResult::failure("seed", "seed_execution", "disk full", 6);

        let payload: Value = serde_json::from_str(&result.output).expect("json payload");
        assert_eq!(result.exit_code, 6);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "seed_execution");
        assert_eq!(payload["message"], "disk full");
    }

    #[test]
    fn success_payload_has_null_error_class() {
        let result = CommandResult::success("migrate", "applied pending migrations");

        let payload: Value = serde_json::from_str(&result.output).expect("json payload");
        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert!(payload["error_class"].is_null());
    }
}
