use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";
pub const NESTED_CONFIG_FILE: &str = "config/storefront.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub log_level: Option<String>,
    pub server_port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub client_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://storefront.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 3000,
                graceful_shutdown_secs: 15,
                static_dir: None,
            },
            client: ClientConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_secs: 10,
                max_retries: 3,
                retry_base_delay_ms: 250,
                retry_max_delay_ms: 5_000,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(static_dir) = server.static_dir {
                self.server.static_dir = Some(static_dir);
            }
        }

        if let Some(client) = patch.client {
            if let Some(base_url) = client.base_url {
                self.client.base_url = base_url;
            }
            if let Some(timeout_secs) = client.timeout_secs {
                self.client.timeout_secs = timeout_secs;
            }
            if let Some(max_retries) = client.max_retries {
                self.client.max_retries = max_retries;
            }
            if let Some(retry_base_delay_ms) = client.retry_base_delay_ms {
                self.client.retry_base_delay_ms = retry_base_delay_ms;
            }
            if let Some(retry_max_delay_ms) = client.retry_max_delay_ms {
                self.client.retry_max_delay_ms = retry_max_delay_ms;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STOREFRONT_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("STOREFRONT_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("STOREFRONT_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("STOREFRONT_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STOREFRONT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_PORT") {
            self.server.port = parse_u16("STOREFRONT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("STOREFRONT_CLIENT_BASE_URL") {
            self.client.base_url = value;
        }
        if let Some(value) = read_env("STOREFRONT_CLIENT_TIMEOUT_SECS") {
            self.client.timeout_secs = parse_u64("STOREFRONT_CLIENT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_CLIENT_MAX_RETRIES") {
            self.client.max_retries = parse_u32("STOREFRONT_CLIENT_MAX_RETRIES", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_CLIENT_RETRY_BASE_DELAY_MS") {
            self.client.retry_base_delay_ms =
                parse_u64("STOREFRONT_CLIENT_RETRY_BASE_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_CLIENT_RETRY_MAX_DELAY_MS") {
            self.client.retry_max_delay_ms =
                parse_u64("STOREFRONT_CLIENT_RETRY_MAX_DELAY_MS", &value)?;
        }

        let log_level =
            read_env("STOREFRONT_LOGGING_LEVEL").or_else(|| read_env("STOREFRONT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STOREFRONT_LOGGING_FORMAT").or_else(|| read_env("STOREFRONT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(max_connections) = overrides.database_max_connections {
            self.database.max_connections = max_connections;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(static_dir) = overrides.static_dir {
            self.server.static_dir = Some(static_dir);
        }
        if let Some(base_url) = overrides.client_base_url {
            self.client.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_client(&self.client)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Explicit path if it exists, otherwise the first conventional location found.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_client(client: &ClientConfig) -> Result<(), ConfigError> {
    let base_url = client.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "client.base_url must start with http:// or https://".to_string(),
        ));
    }

    if client.timeout_secs == 0 || client.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "client.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if client.retry_max_delay_ms < client.retry_base_delay_ms {
        return Err(ConfigError::Validation(
            "client.retry_max_delay_ms must not be below client.retry_base_delay_ms".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    client: Option<ClientPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ClientPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    retry_max_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
