use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::inquiry::NumberingStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub numbering: NumberingConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

pub const CONFIG_VERSION: &str = "1.0";

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            numbering: NumberingConfig::default(),
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Mount point of the inquiry routes. Empty mounts them at the root.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_prefix: default_api_prefix(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl ServerConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` selects [`default_database_path`](crate::db::default_database_path).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// The configured path, else the per-user default, else
    /// `inquiry-desk.db` in the working directory when no home directory
    /// is known.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(crate::db::default_database_path)
            .unwrap_or_else(|| PathBuf::from("inquiry-desk.db"))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NumberingConfig {
    #[serde(default)]
    pub strategy: NumberingStrategy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. `info` or `inquiry_desk=debug,tower_http=info`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
