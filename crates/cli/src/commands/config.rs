use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use storefront_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

struct ConfigSource {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

impl ConfigSource {
    fn detect() -> Self {
        let path = resolve_config_path(None);
        let doc = load_config_file_doc(path.as_deref());
        Self { path, doc }
    }

    fn line(&self, key_path: &str, env_keys: &[&str], value: &str) -> String {
        render_line(key_path, value, self.field_source(key_path, env_keys))
    }

    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_deref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    render(&config, &ConfigSource::detect())
}

fn render(config: &AppConfig, source: &ConfigSource) -> String {
    let static_dir = config
        .server
        .static_dir
        .as_deref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        source.line("database.url", &["STOREFRONT_DATABASE_URL"], &config.database.url),
        source.line(
            "database.max_connections",
            &["STOREFRONT_DATABASE_MAX_CONNECTIONS"],
            &config.database.max_connections.to_string(),
        ),
        source.line(
            "database.timeout_secs",
            &["STOREFRONT_DATABASE_TIMEOUT_SECS"],
            &config.database.timeout_secs.to_string(),
        ),
        source.line(
            "server.bind_address",
            &["STOREFRONT_SERVER_BIND_ADDRESS"],
            &config.server.bind_address,
        ),
        source.line("server.port", &["STOREFRONT_SERVER_PORT"], &config.server.port.to_string()),
        source.line(
            "server.graceful_shutdown_secs",
            &["STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            &config.server.graceful_shutdown_secs.to_string(),
        ),
        source.line("server.static_dir", &["STOREFRONT_SERVER_STATIC_DIR"], &static_dir),
        source.line("client.base_url", &["STOREFRONT_CLIENT_BASE_URL"], &config.client.base_url),
        source.line(
            "client.timeout_secs",
            &["STOREFRONT_CLIENT_TIMEOUT_SECS"],
            &config.client.timeout_secs.to_string(),
        ),
        source.line(
            "client.max_retries",
            &["STOREFRONT_CLIENT_MAX_RETRIES"],
            &config.client.max_retries.to_string(),
        ),
        source.line(
            "client.retry_base_delay_ms",
            &["STOREFRONT_CLIENT_RETRY_BASE_DELAY_MS"],
            &config.client.retry_base_delay_ms.to_string(),
        ),
        source.line(
            "client.retry_max_delay_ms",
            &["STOREFRONT_CLIENT_RETRY_MAX_DELAY_MS"],
            &config.client.retry_max_delay_ms.to_string(),
        ),
        source.line(
            "logging.level",
            &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"],
            &config.logging.level,
        ),
        source.line(
            "logging.format",
            &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"],
            &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        ),
    ];

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
