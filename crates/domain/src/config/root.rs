use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::collector::{CollectorConfig, TransportKind};
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::output::{OutputConfig, OutputFormat};

const LOCAL_CONFIG_PATH: &str = "dnstap-collector.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnstap-collector/config.toml";

/// Main configuration structure for the dnstap collector
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Stdout sink configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Listeners, one collector per entry
    #[serde(default = "default_collectors")]
    pub collectors: Vec<CollectorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
            collectors: default_collectors(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnstap-collector.toml in current directory
    /// 3. /etc/dnstap-collector/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.output_format {
            self.output.format = format;
        }
        if let Some(port) = overrides.listen_port {
            for collector in self
                .collectors
                .iter_mut()
                .filter(|c| c.transport == TransportKind::Tcp)
            {
                collector.listen_port = port;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collectors.is_empty() {
            return Err(ConfigError::Validation(
                "No collectors configured".to_string(),
            ));
        }

        if self.output.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "Output queue capacity cannot be 0".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for collector in &self.collectors {
            collector.validate()?;

            if !names.insert(collector.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate collector name '{}'",
                    collector.name
                )));
            }

            if collector.transport == TransportKind::Tcp && collector.listen_port == 0 {
                return Err(ConfigError::InvalidCollector {
                    name: collector.name.clone(),
                    reason: "listen_port cannot be 0".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

fn default_collectors() -> Vec<CollectorConfig> {
    vec![CollectorConfig::default()]
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub output_format: Option<OutputFormat>,
    /// Applied to every TCP collector.
    pub listen_port: Option<u16>,
}
