use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentlensConfig {
    pub store: StoreConfig,
    pub assistant_api: AssistantApiConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgREST interface of the hosted database.
    #[default]
    Rest,
    /// Direct Postgres connection.
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Rest => write!(f, "rest"),
            StoreBackend::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Project URL of the hosted database, e.g. `https://<ref>.supabase.co`.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub service_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_pool_max")]
    pub pool_max_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantApiConfig {
    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default = "default_first_message_chars")]
    pub first_message_chars: usize,
}

fn default_table() -> String {
    "customers".to_string()
}

fn default_pool_max() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_assistant_base_url() -> String {
    crate::assistant::VAPI_API_BASE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_first_message_chars() -> usize {
    50
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            service_key: String::new(),
            table: default_table(),
            database_url: String::new(),
            pool_max_connections: default_pool_max(),
            acquire_timeout_secs: default_acquire_timeout(),
            timeout_secs: None,
        }
    }
}

impl Default for AssistantApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_assistant_base_url(),
            token: String::new(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            first_message_chars: default_first_message_chars(),
        }
    }
}

impl AgentlensConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_with_file(None)
    }

    /// Loads the layered configuration. `extra` is an explicitly requested
    /// file and must exist; every other location is optional.
    pub fn load_with_file(extra: Option<&Path>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();
        Self::build(get_config_paths(), extra)
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        Self::build(paths, None)
    }

    fn build(paths: Vec<PathBuf>, extra: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("AGENTLENS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AgentlensConfig = builder.build()?.try_deserialize()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_value(&["SUPABASE_URL"]) {
            self.store.url = url;
        }
        if let Some(key) = env_value(&["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_KEY"]) {
            self.store.service_key = key;
        }
        if let Some(url) = env_value(&["DATABASE_URL"]) {
            self.store.database_url = url;
        }
        if let Some(token) = env_value(&["VAPI_PRIVATE_KEY", "VAPI_API_KEY"]) {
            self.assistant_api.token = token;
        }
        if let Some(url) = env_value(&["VAPI_BASE_URL"]) {
            self.assistant_api.base_url = url;
        }
        if let Some(level) = env_value(&["AGENTLENS_LOG_LEVEL"]) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.store.backend {
            StoreBackend::Rest => {
                if self.store.url.trim().is_empty() {
                    return Err(ConfigLoadError::MissingRequired(
                        "store.url (SUPABASE_URL)".to_string(),
                    ));
                }
                if !is_http_url(&self.store.url) {
                    return Err(ConfigLoadError::InvalidValue {
                        key: "store.url".to_string(),
                        message: "Must start with http:// or https://".to_string(),
                    });
                }
                if self.store.service_key.trim().is_empty() {
                    return Err(ConfigLoadError::MissingRequired(
                        "store.service_key (SUPABASE_SERVICE_ROLE_KEY)".to_string(),
                    ));
                }
            }
            StoreBackend::Postgres => {
                if self.store.database_url.trim().is_empty() {
                    return Err(ConfigLoadError::MissingRequired(
                        "store.database_url (DATABASE_URL)".to_string(),
                    ));
                }
                if !self.store.database_url.starts_with("postgres://")
                    && !self.store.database_url.starts_with("postgresql://")
                {
                    return Err(ConfigLoadError::InvalidValue {
                        key: "store.database_url".to_string(),
                        message:
                            "Must be a valid PostgreSQL URL starting with postgres:// or postgresql://"
                                .to_string(),
                    });
                }
                if self.store.pool_max_connections == 0 {
                    return Err(ConfigLoadError::InvalidValue {
                        key: "store.pool_max_connections".to_string(),
                        message: "Must be greater than 0".to_string(),
                    });
                }
            }
        }

        if !is_plain_identifier(&self.store.table) {
            return Err(ConfigLoadError::InvalidValue {
                key: "store.table".to_string(),
                message: format!(
                    "'{}' is not a plain table name (letters, digits and '_' only)",
                    self.store.table
                ),
            });
        }

        if self.assistant_api.token.trim().is_empty() {
            return Err(ConfigLoadError::MissingRequired(
                "assistant_api.token (VAPI_PRIVATE_KEY)".to_string(),
            ));
        }

        if !is_http_url(&self.assistant_api.base_url) {
            return Err(ConfigLoadError::InvalidValue {
                key: "assistant_api.base_url".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        if self.display.first_message_chars == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "display.first_message_chars".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        // Same syntax as RUST_LOG: a level, a target, or a list of directives.
        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!("Invalid log filter '{}': {}", self.logging.level, e),
            });
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Emits the effective configuration at debug level with secrets masked.
    pub fn log_summary(&self) {
        match self.store.backend {
            StoreBackend::Rest => debug!(
                backend = %self.store.backend,
                url = %self.store.url,
                service_key = %mask_secret(&self.store.service_key),
                table = %self.store.table,
                "Data store configured"
            ),
            StoreBackend::Postgres => debug!(
                backend = %self.store.backend,
                database_url = %mask_password(&self.store.database_url),
                table = %self.store.table,
                "Data store configured"
            ),
        }
        debug!(
            base_url = %self.assistant_api.base_url,
            token = %mask_secret(&self.assistant_api.token),
            timeout_secs = ?self.assistant_api.timeout_secs,
            "Assistant API configured"
        );
    }
}

fn env_value(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Keeps the first four characters of a secret and masks the rest.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

pub fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(proto_end) = url.find("://") {
            if proto_end + 3 <= at_pos {
                let before_auth = &url[..proto_end + 3];
                let after_at = &url[at_pos..];
                if let Some(colon_pos) = url[proto_end + 3..at_pos].find(':') {
                    let user = &url[proto_end + 3..proto_end + 3 + colon_pos];
                    return format!("{}{}:****{}", before_auth, user, after_at);
                }
            }
        }
    }
    url.to_string()
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("agentlens.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".agentlens").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    for path in get_dotenv_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".agentlens").join(".env"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agentlens"))
}
