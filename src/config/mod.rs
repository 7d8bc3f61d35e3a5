//! Layered application configuration: defaults, optional JSON file, environment.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend selector; unknown values fall back to the default backend.
    #[serde(rename = "type")]
    pub type_: String,
    pub local: LocalConfig,
    pub surreal: SurrealConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            type_: "local".into(),
            local: LocalConfig::default(),
            surreal: SurrealConfig::default(),
        }
    }
}

/// Embedded KV store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub path: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            path: "data/properties.db".into(),
        }
    }
}

/// Document database settings. Credentials are optional for embedded engines.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SurrealConfig {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SurrealConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8000".into(),
            namespace: "properties".into(),
            database: "main".into(),
            username: None,
            password: None,
        }
    }
}

/// Load configuration: defaults, overlaid by the JSON file at `CONFIG_PATH`
/// (when set), overlaid by individual environment variables. Invalid values
/// are fatal.
pub fn load() -> Result<AppConfig, ConfigError> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => from_file(Path::new(&path))?,
        Err(_) => AppConfig::default(),
    };
    let vars: HashMap<String, String> = std::env::vars().collect();
    overlay(&mut config, &vars)?;
    validate(&config)?;
    Ok(config)
}

/// Parse a full config file; missing sections keep their defaults.
pub fn from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

fn overlay(config: &mut AppConfig, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
    if let Some(host) = vars.get("HOST") {
        config.server.host = host.clone();
    }
    if let Some(port) = vars.get("PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            reason: format!("'{}' is not a port number", port),
        })?;
    }
    if let Some(timeout) = vars.get("REQUEST_TIMEOUT_SECS") {
        config.server.timeout_secs = timeout.parse().map_err(|_| ConfigError::Invalid {
            key: "REQUEST_TIMEOUT_SECS",
            reason: format!("'{}' is not a number of seconds", timeout),
        })?;
    }
    if let Some(type_) = vars.get("STORAGE_TYPE") {
        config.storage.type_ = type_.clone();
    }
    if let Some(path) = vars.get("SLED_PATH") {
        config.storage.local.path = path.clone();
    }
    if let Some(endpoint) = vars.get("SURREAL_ENDPOINT") {
        config.storage.surreal.endpoint = endpoint.clone();
    }
    if let Some(ns) = vars.get("SURREAL_NS") {
        config.storage.surreal.namespace = ns.clone();
    }
    if let Some(db) = vars.get("SURREAL_DB") {
        config.storage.surreal.database = db.clone();
    }
    if let Some(user) = vars.get("SURREAL_USER") {
        config.storage.surreal.username = Some(user.clone());
    }
    if let Some(pass) = vars.get("SURREAL_PASS") {
        config.storage.surreal.password = Some(pass.clone());
    }
    Ok(())
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            key: "server.port",
            reason: "must be non-zero".into(),
        });
    }
    if config.server.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "server.timeout_secs",
            reason: "must be non-zero".into(),
        });
    }
    if config.storage.type_.is_empty() {
        return Err(ConfigError::Invalid {
            key: "storage.type",
            reason: "must not be empty".into(),
        });
    }
    if config.storage.local.path.is_empty() {
        return Err(ConfigError::Invalid {
            key: "storage.local.path",
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.type_, "local");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn file_overrides_defaults_and_keeps_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server": {{"port": 9000}}, "storage": {{"type": "surreal"}}}}"#
        )
        .unwrap();

        let config = from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.type_, "surreal");
        assert_eq!(config.storage.local.path, "data/properties.db");
    }

    #[test]
    fn env_overlay_wins_over_file_values() {
        let mut config = AppConfig::default();
        let vars: HashMap<String, String> = [
            ("PORT".to_string(), "9999".to_string()),
            ("STORAGE_TYPE".to_string(), "surreal".to_string()),
            ("SURREAL_ENDPOINT".to_string(), "mem://".to_string()),
        ]
        .into();

        overlay(&mut config, &vars).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.storage.type_, "surreal");
        assert_eq!(config.storage.surreal.endpoint, "mem://");
    }

    #[test]
    fn bad_port_is_fatal() {
        let mut config = AppConfig::default();
        let vars: HashMap<String, String> =
            [("PORT".to_string(), "not-a-port".to_string())].into();

        assert!(overlay(&mut config, &vars).is_err());
    }
}
