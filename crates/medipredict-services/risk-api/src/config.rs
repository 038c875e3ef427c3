use crate::error::{MpError, Result};
use axum::http::HeaderValue;
use mp_tracing::{TracingConfig, LOG_LEVELS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name used for tracing, log files and the config file lookup.
pub const SERVICE_NAME: &str = "risk-api";

/// Environment prefix: `MEDIPREDICT__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "MEDIPREDICT";

/// Optional config file, resolved against the working directory.
pub const CONFIG_FILE: &str = "config/medipredict";

/// Comma-separated in the environment:
/// `MEDIPREDICT__CORS__ALLOWED_ORIGINS=http://a.example,http://b.example`.
const CORS_ORIGINS_KEY: &str = "cors.allowed_origins";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_v1_prefix")]
    pub v1_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins, or the single entry `*` for any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Overrides the level implied by `app.debug`.
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default = "default_to_file")]
    pub to_file: bool,

    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_app_name() -> String {
    "MediPredict Lite API".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_description() -> String {
    "MediPredict Lite - Disease Risk Analysis API".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_v1_prefix() -> String {
    "/api/v1".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_allow_credentials() -> bool {
    true
}

fn default_to_file() -> bool {
    true
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file_name() -> String {
    "app.log".to_string()
}

fn default_max_files() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            description: default_description(),
            debug: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            v1_prefix: default_v1_prefix(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            to_file: default_to_file(),
            directory: default_log_directory(),
            file_name: default_log_file_name(),
            max_files: default_max_files(),
        }
    }
}

impl CorsConfig {
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Parses the allow-list into header values.
    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    MpError::config(format!("invalid CORS origin '{origin}': {e}"))
                })
            })
            .collect()
    }
}

impl Config {
    /// Loads `config/medipredict.{yaml,toml,json}` if present, then applies
    /// `MEDIPREDICT__*` environment overrides.
    pub fn from_env() -> Result<Self> {
        mp_config::ConfigBuilder::new()
            .add_optional_file(CONFIG_FILE)
            .add_env_with_prefix(ENV_PREFIX)
            .list_key(CORS_ORIGINS_KEY)
            .build()
    }

    /// Checks values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let prefix = &self.api.v1_prefix;
        if !prefix.starts_with('/') || prefix == "/" || prefix.ends_with('/') {
            return Err(MpError::invalid_input(
                "api.v1_prefix",
                format!("'{prefix}' must start with '/', not end with '/', and not be the root"),
            ));
        }

        if self.server.port == 0 {
            return Err(MpError::invalid_input("server.port", "port must be non-zero"));
        }

        if self.cors.allows_any_origin() && self.cors.allowed_origins.len() > 1 {
            return Err(MpError::invalid_input(
                "cors.allowed_origins",
                "'*' cannot be combined with explicit origins",
            ));
        }
        if !self.cors.allows_any_origin() {
            self.cors.origin_header_values()?;
        }

        let level = self.log_level();
        if !LOG_LEVELS.contains(&level) {
            return Err(MpError::invalid_input(
                "logging.level",
                format!("invalid log level '{level}'"),
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Explicit level, else `debug` in debug mode, else `info`.
    pub fn log_level(&self) -> &str {
        match &self.logging.level {
            Some(level) => level.as_str(),
            None if self.app.debug => "debug",
            None => "info",
        }
    }

    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::new(SERVICE_NAME, self.log_level())
            .with_file_name(self.logging.file_name.clone())
            .with_max_files(self.logging.max_files);

        if self.logging.to_file {
            config.with_log_dir(self.logging.directory.clone())
        } else {
            config
        }
    }
}
