use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use storefront_cli::commands::{doctor, migrate, products, seed};
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(&[("STOREFRONT_DATABASE_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_for_non_sqlite_url() {
    with_env(&[("STOREFRONT_DATABASE_URL", "postgres://localhost/store")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn migrate_returns_config_failure_for_unparseable_env_value() {
    with_env(
        &[
            ("STOREFRONT_DATABASE_URL", "sqlite::memory:"),
            ("STOREFRONT_DATABASE_MAX_CONNECTIONS", "many"),
        ],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 2);
            assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
        },
    );
}

#[test]
fn seed_inserts_catalog_into_empty_store() {
    with_env(&[("STOREFRONT_DATABASE_URL", "sqlite::memory:")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "inserted 10 catalog products");
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    let url = file_url(&dir);

    with_env(&[("STOREFRONT_DATABASE_URL", url.as_str())], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["message"], "inserted 10 catalog products");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["status"], "ok");
        assert_eq!(
            second_payload["message"],
            "catalog already holds 10 products; nothing inserted"
        );
    });
}

#[test]
fn products_lists_seeded_catalog_as_json() {
    let dir = TempDir::new().expect("temp dir");
    let url = file_url(&dir);

    with_env(&[("STOREFRONT_DATABASE_URL", url.as_str())], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = products::run();
        assert_eq!(result.exit_code, 0);

        let listing = parse_payload(&result.output);
        let listing = listing.as_array().expect("products array");
        assert_eq!(listing.len(), 10);
        assert_eq!(listing[0]["id"], 1);
        assert_eq!(listing[0]["name"], "Mini Paredão #13");
        assert_eq!(listing[9]["name"], "Mini Paredão #4");
    });
}

#[test]
fn products_on_fresh_store_is_an_empty_array() {
    with_env(&[("STOREFRONT_DATABASE_URL", "sqlite::memory:")], || {
        let result = products::run();
        assert_eq!(result.exit_code, 0);
        assert_eq!(parse_payload(&result.output), Value::Array(Vec::new()));
    });
}

#[test]
fn doctor_reports_missing_catalog_before_seed() {
    let dir = TempDir::new().expect("temp dir");
    let url = file_url(&dir);

    with_env(&[("STOREFRONT_DATABASE_URL", url.as_str())], || {
        assert_eq!(migrate::run().exit_code, 0);

        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["name"], "config_validation");
        assert_eq!(report["checks"][0]["status"], "pass");
        assert_eq!(report["checks"][1]["name"], "database_connectivity");
        assert_eq!(report["checks"][1]["status"], "pass");
        assert_eq!(report["checks"][2]["name"], "catalog_readiness");
        assert_eq!(report["checks"][2]["status"], "fail");

        assert_eq!(seed::run().exit_code, 0);
        let report = parse_payload(&doctor::run(true));
        assert_eq!(report["overall_status"], "pass");
    });
}

#[test]
fn doctor_skips_database_checks_when_config_is_invalid() {
    with_env(&[("STOREFRONT_SERVER_PORT", "0")], || {
        let report = parse_payload(&doctor::run(true));

        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][0]["status"], "fail");
        assert_eq!(report["checks"][1]["status"], "skipped");
        assert_eq!(report["checks"][2]["status"], "skipped");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn file_url(dir: &TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("storefront.db").display())
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STOREFRONT_DATABASE_URL",
        "STOREFRONT_DATABASE_MAX_CONNECTIONS",
        "STOREFRONT_DATABASE_TIMEOUT_SECS",
        "STOREFRONT_SERVER_BIND_ADDRESS",
        "STOREFRONT_SERVER_PORT",
        "STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "STOREFRONT_SERVER_STATIC_DIR",
        "STOREFRONT_CLIENT_BASE_URL",
        "STOREFRONT_CLIENT_TIMEOUT_SECS",
        "STOREFRONT_CLIENT_MAX_RETRIES",
        "STOREFRONT_CLIENT_RETRY_BASE_DELAY_MS",
        "STOREFRONT_CLIENT_RETRY_MAX_DELAY_MS",
        "STOREFRONT_LOGGING_LEVEL",
        "STOREFRONT_LOGGING_FORMAT",
        "STOREFRONT_LOG_LEVEL",
        "STOREFRONT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
