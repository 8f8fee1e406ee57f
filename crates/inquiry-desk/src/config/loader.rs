use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "INQUIRY_DESK_CONFIG";
pub const ENV_BIND_ADDRESS: &str = "INQUIRY_DESK_BIND";
pub const ENV_DATABASE_PATH: &str = "INQUIRY_DESK_DB";
pub const ENV_LOG_FILTER: &str = "INQUIRY_DESK_LOG";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config = read_config(path.as_ref())?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Builds the runtime configuration: the file named by `INQUIRY_DESK_CONFIG`
/// (or built-in defaults when unset), then environment overrides, then
/// validation.
pub fn load_from_env() -> Result<Config, ConfigError> {
    let mut config = match std::env::var_os(ENV_CONFIG_PATH) {
        Some(path) => read_config(Path::new(&path))?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Applies overrides from `lookup`, keyed by the `INQUIRY_DESK_*` variable
/// names. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get(ENV_BIND_ADDRESS) {
        config.server.bind_address = bind;
    }
    if let Some(path) = get(ENV_DATABASE_PATH) {
        config.database.path = Some(PathBuf::from(path));
    }
    if let Some(filter) = get(ENV_LOG_FILTER) {
        config.logging.filter = filter;
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::Validation { message });

    if config.version != CONFIG_VERSION {
        return invalid(format!("Unsupported config version: {}", config.version));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        return invalid(format!(
            "server.bind_address '{}' is not a socket address",
            config.server.bind_address
        ));
    }

    let prefix = &config.server.api_prefix;
    if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
        return invalid(format!(
            "server.api_prefix '{}' must start with '/' and not end with '/'",
            prefix
        ));
    }

    if config.server.allowed_origins.is_empty() {
        return invalid("server.allowed_origins must not be empty".to_string());
    }

    let pagination = &config.pagination;
    if pagination.default_limit == 0 {
        return invalid("pagination.default_limit must be at least 1".to_string());
    }
    if pagination.max_limit < pagination.default_limit {
        return invalid(format!(
            "pagination.max_limit ({}) is below default_limit ({})",
            pagination.max_limit, pagination.default_limit
        ));
    }

    if config.logging.filter.trim().is_empty() {
        return invalid("logging.filter must not be empty".to_string());
    }

    Ok(())
}
