use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player selection configuration
    pub player: PlayerConfig,

    /// Bus configuration
    pub bus: BusConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Selector used when `-s` is not given (index or bus name suffix)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_service: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// How long to wait for a player to answer (in milliseconds)
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (off, error, warn, info, debug, trace)
    pub level: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig { timeout_ms: 5000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults.
    /// A missing file at an explicit path is created with the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let Some(path) = config_path else {
            return Ok(Config::default());
        };

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context("Failed to read configuration file")?;

            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            let default_config = Config::default();
            default_config.save(path)?;
            Ok(default_config)
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        std::fs::write(path, toml_content)
            .context("Failed to write configuration file")?;

        Ok(())
    }

    /// The configured level, or `Warn` if it does not parse
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player.default_service, None);
        assert_eq!(config.bus.timeout_ms, 5000);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.player.default_service = Some("vlc".to_string());
        let toml_str = toml::to_string(&config).unwrap();
        let parsed_config: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed_config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[player]\ndefault_service = \"spotify\"\n").unwrap();
        assert_eq!(parsed.player.default_service.as_deref(), Some("spotify"));
        assert_eq!(parsed.bus.timeout_ms, 5000);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(path.as_path())).unwrap();

        // Should create default config and file should now exist
        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load_without_path() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path();

        let mut config = Config::default();
        config.bus.timeout_ms = 1000;
        config.logging.level = "debug".to_string();

        config.save(temp_path).unwrap();
        let loaded_config = Config::load(Some(temp_path)).unwrap();

        assert_eq!(loaded_config.bus.timeout_ms, 1000);
        assert_eq!(loaded_config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_log_level_falls_back() {
        let mut config = Config::default();
        config.logging.level = "chatty".to_string();
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "bus = 3").unwrap();
        assert!(Config::load(Some(temp_file.path())).is_err());
    }
}
