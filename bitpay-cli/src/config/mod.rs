//! Configuration module for bitpay-cli.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use bitpay_sdk::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    api_key_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, api_key_override: Option<String>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            api_key_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI/env overrides
    /// 3. Validate the configuration
    /// 4. Build the SDK configuration
    pub fn load(&self) -> Result<Config, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(key) = self.api_key_override.as_ref().filter(|k| !k.is_empty()) {
            file_config.api.key = key.clone();
        }

        self.validate(&file_config)?;

        Ok(build_config(file_config))
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.api.key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api key is missing: set [api].key or BITPAY_API_KEY".to_owned(),
            ));
        }
        if config.defaults.api_key.is_some() {
            return Err(ConfigError::ValidationError(
                "[defaults].api_key is not supported: set [api].key instead".to_owned(),
            ));
        }
        Ok(())
    }
}

fn build_config(file_config: FileConfig) -> Config {
    Config {
        api_key: file_config.api.key,
        api_url: file_config.api.url,
        verify_pos: file_config.pos_data.verify,
        use_logging: file_config.logging.enabled,
        log_file: file_config.logging.file,
        body_encoding: file_config.api.body_encoding,
        defaults: file_config.defaults,
    }
}
