//! CLI configuration
//!
//! Resolution order: built-in defaults, then the TOML file (if it exists),
//! then `VERIOT_*` environment variables, then validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable overriding `ledger.backend`
pub const ENV_BACKEND: &str = "VERIOT_LEDGER_BACKEND";
/// Environment variable overriding `ledger.data_dir`
pub const ENV_DATA_DIR: &str = "VERIOT_DATA_DIR";
/// Environment variable overriding `log_level`
pub const ENV_LOG_LEVEL: &str = "VERIOT_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`]
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid configuration for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Which ledger handler backs the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local; nothing persists between invocations
    Memory,
    /// One file per key under `data_dir`
    Filesystem,
}

impl std::str::FromStr for LedgerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "filesystem" => Ok(Self::Filesystem),
            other => Err(ConfigError::Invalid {
                field: "ledger.backend".to_string(),
                reason: format!("unknown backend {other:?}"),
            }),
        }
    }
}

/// Ledger section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Handler to use
    pub backend: LedgerBackend,
    /// Directory for the filesystem handler
    pub data_dir: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::Filesystem,
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("veriot")
                .join("ledger"),
        }
    }
}

/// Top-level CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,
    /// Ledger settings
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location (`<config dir>/veriot/config.toml`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veriot")
            .join("config.toml")
    }

    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` (defaults if the file does not exist), apply
    /// environment overrides and validate.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path).await {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VERIOT_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs; unrelated names are ignored.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                ENV_BACKEND => self.ledger.backend = value.parse()?,
                ENV_DATA_DIR => self.ledger.data_dir = PathBuf::from(value),
                ENV_LOG_LEVEL => self.log_level = value.to_ascii_lowercase(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "log_level".to_string(),
                reason: format!(
                    "{:?} is not one of {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.ledger.backend == LedgerBackend::Filesystem
            && self.ledger.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid {
                field: "ledger.data_dir".to_string(),
                reason: "must be set for the filesystem backend".to_string(),
            });
        }
        Ok(())
    }
}
