//! Configuration file management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vetmint_engine::{Genesis, Settings};
use vetmint_types::CallerId;

/// Complete host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Operator bootstrap, used only when no state is stored yet.
    #[serde(default)]
    pub genesis: GenesisConfig,
    /// Initial engine settings, used only when no state is stored yet.
    #[serde(default)]
    pub settings: Settings,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Operator identity and its member record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Operator identity, `0x`-prefixed hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<CallerId>,
    #[serde(default = "default_operator_name")]
    pub name: String,
    #[serde(default = "default_avatar_id")]
    pub avatar_id: u32,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_operator_name() -> String {
    "admin".to_string()
}

fn default_avatar_id() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            operator: None,
            name: default_operator_name(),
            avatar_id: default_avatar_id(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl GenesisConfig {
    /// Genesis registration at `joined_at`.
    pub fn to_genesis(&self, joined_at: u64) -> anyhow::Result<Genesis> {
        let operator = self.operator.ok_or_else(|| {
            anyhow::anyhow!("genesis.operator must be set to bootstrap a new engine")
        })?;
        Ok(Genesis {
            operator,
            name: self.name.clone(),
            avatar_id: self.avatar_id,
            joined_at,
        })
    }
}

impl HostConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: HostConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("VETMINT_CONFIG") {
            return PathBuf::from(path);
        }
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("VETMINT_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Vetmint")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".vetmint")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/vetmint"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert!(config.genesis.operator.is_none());
        assert_eq!(config.genesis.name, "admin");
        assert_eq!(config.genesis.avatar_id, 1);
        assert!(!config.settings.registration_enabled);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn test_config_serialization() {
        let config = HostConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: HostConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_parse_full_file() {
        let config: HostConfig = toml::from_str(
            r#"
            [genesis]
            operator = "0x0101010101010101010101010101010101010101"
            name = "operator"

            [settings]
            registration_enabled = true
            supply_cap = 2
            unit_price = "1000"

            [storage]
            data_dir = "/var/lib/vetmint"

            [logging]
            log_level = "debug"
            "#,
        )
        .expect("parse");

        let genesis = config.genesis.to_genesis(42).expect("genesis");
        assert_eq!(genesis.operator, CallerId::from_bytes([1; 20]));
        assert_eq!(genesis.name, "operator");
        assert_eq!(genesis.avatar_id, 1);
        assert_eq!(genesis.joined_at, 42);
        assert!(config.settings.registration_enabled);
        assert!(!config.settings.issuance_enabled);
        assert_eq!(config.settings.supply_cap, 2);
        assert_eq!(config.settings.unit_price, 1000);
        assert_eq!(config.data_dir(), PathBuf::from("/var/lib/vetmint"));
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_genesis_requires_operator() {
        assert!(GenesisConfig::default().to_genesis(0).is_err());
    }
}
