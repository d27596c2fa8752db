use serde::{Deserialize, Serialize};

use super::connector::ConnectorConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use crate::dns_server::DnsServerAddr;

/// Main configuration structure for Ferrous SOCKS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub connector: ConnectorConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-socks.toml in current directory
    /// 3. /etc/ferrous-socks/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ferrous-socks.toml").exists() {
            Self::from_file("ferrous-socks.toml")?
        } else if std::path::Path::new("/etc/ferrous-socks/config.toml").exists() {
            Self::from_file("/etc/ferrous-socks/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(server) = overrides.dns_server {
            self.dns.server = Some(server);
        }
        if let Some(secs) = overrides.step_timeout_secs {
            self.connector.step_timeout_secs = secs;
        }
        if let Some(user) = overrides.username {
            self.connector.username = Some(user);
        }
        if let Some(pass) = overrides.password {
            self.connector.password = Some(pass);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connector.step_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "step_timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.connector.socket_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "socket_timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.dns.query_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_secs cannot be 0".to_string(),
            ));
        }

        if let Some(server) = &self.dns.server {
            server
                .parse::<DnsServerAddr>()
                .map_err(ConfigError::Validation)?;
        }

        if self.connector.password.is_some() && self.connector.username.is_none() {
            return Err(ConfigError::Validation(
                "password given without username".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_server: Option<String>,
    pub step_timeout_secs: Option<u64>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub log_level: Option<String>,
}
