//! Configuration loading and management
//!
//! Settings come from an optional YAML file (path in `RENT_LEDGER_CONFIG`)
//! and are then overridden by environment variables:
//!
//! | Variable                   | Setting               |
//! |----------------------------|-----------------------|
//! | `HOST`                     | `server.host`         |
//! | `PORT`                     | `server.port`         |
//! | `MONGODB_URI`              | `storage.uri`         |
//! | `MONGODB_DATABASE`         | `storage.database`    |
//! | `RENT_LEDGER_TRANSACTIONS` | `storage.transactions`|
//!
//! Without a storage URI the in-memory store is used.

use crate::services::dashboard::MAX_LEDGER_MONTHS;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Environment variable holding the path of the YAML config file
pub const CONFIG_PATH_ENV: &str = "RENT_LEDGER_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// MongoDB connection string; `None` selects the in-memory store
    pub uri: Option<String>,
    pub database: String,
    /// Run the tenant cascade in a transaction (needs a replica set)
    pub transactions: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: "rent_ledger".to_string(),
            transactions: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Months shown in the grid when none are requested
    pub window_months: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { window_months: 4 }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ledger: LedgerConfig,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            ledger: LedgerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("invalid config file {}", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the file named by `RENT_LEDGER_CONFIG` (if any), then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(&path)?,
            _ => Self::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment-style lookups
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
        }
        if let Some(uri) = get("MONGODB_URI") {
            self.storage.uri = Some(uri);
        }
        if let Some(database) = get("MONGODB_DATABASE") {
            self.storage.database = database;
        }
        if let Some(flag) = get("RENT_LEDGER_TRANSACTIONS") {
            self.storage.transactions = parse_flag(&flag).with_context(|| {
                format!("RENT_LEDGER_TRANSACTIONS must be a boolean, got {:?}", flag)
            })?;
        }

        Ok(self)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ledger.window_months == 0 || self.ledger.window_months > MAX_LEDGER_MONTHS {
            bail!(
                "ledger.window_months must be between 1 and {}, got {}",
                MAX_LEDGER_MONTHS,
                self.ledger.window_months
            );
        }
        if self.storage.database.trim().is_empty() {
            bail!("storage.database must not be empty");
        }
        Ok(())
    }

    /// Address to bind the HTTP listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.storage.uri, None);
        assert_eq!(config.storage.database, "rent_ledger");
        assert_eq!(config.ledger.window_months, 4);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  port: 8080
storage:
  uri: mongodb://localhost:27017
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.storage.uri.as_deref(),
            Some("mongodb://localhost:27017")
        );
        assert_eq!(config.storage.database, "rent_ledger");
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ledger:\n  window_months: 6\nlog_level: debug").unwrap();

        let config = AppConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.ledger.window_months, 6);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::from_yaml_file("/nonexistent/rent-ledger.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = AppConfig::from_yaml_str("server:\n  port: 8080\n")
            .unwrap()
            .apply_env(env(&[
                ("PORT", "9000"),
                ("MONGODB_URI", "mongodb://db:27017"),
                ("MONGODB_DATABASE", "rent_test"),
                ("RENT_LEDGER_TRANSACTIONS", "true"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.uri.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(config.storage.database, "rent_test");
        assert!(config.storage.transactions);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = AppConfig::default()
            .apply_env(env(&[("MONGODB_URI", "  "), ("HOST", "")]))
            .unwrap();
        assert_eq!(config.storage.uri, None);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_env_values_are_errors() {
        assert!(
            AppConfig::default()
                .apply_env(env(&[("PORT", "eighty")]))
                .is_err()
        );
        assert!(
            AppConfig::default()
                .apply_env(env(&[("RENT_LEDGER_TRANSACTIONS", "maybe")]))
                .is_err()
        );
    }

    #[test]
    fn test_validate_window_bounds() {
        let mut config = AppConfig::default();
        config.ledger.window_months = 0;
        assert!(config.validate().is_err());
        config.ledger.window_months = MAX_LEDGER_MONTHS + 1;
        assert!(config.validate().is_err());
        config.ledger.window_months = MAX_LEDGER_MONTHS;
        assert!(config.validate().is_ok());
    }
}
