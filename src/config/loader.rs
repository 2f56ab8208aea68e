//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading calculation
//! settings and server configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{ConfigFile, ServerConfig, Settings};

/// Loads and provides access to the engine configuration.
///
/// # File Structure
///
/// ```text
/// settings:
///   target_margin: "15"
///   employment_insurance_rate: "0.009"
///   workers_comp_rate: "0.003"
/// server:
///   bind_address: "127.0.0.1:8000"
/// ```
///
/// # Example
///
/// ```no_run
/// use arari_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/settings.yaml").unwrap();
/// println!("Target margin: {}%", loader.settings().target_margin);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ConfigFile,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML
    /// - A setting is outside its permitted range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let loader = Self::from_yaml_str(&content).map_err(|err| match err {
            EngineError::ConfigParseError { message, .. } => EngineError::ConfigParseError {
                path: path_str.clone(),
                message,
            },
            other => other,
        })?;

        info!(
            path = %path_str,
            target_margin = %loader.settings().target_margin,
            employment_insurance_rate = %loader.settings().employment_insurance_rate,
            workers_comp_rate = %loader.settings().workers_comp_rate,
            "Loaded configuration"
        );

        Ok(loader)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config: ConfigFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        config.settings.validate()?;

        Ok(Self { config })
    }

    /// Returns the calculation settings.
    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    /// Returns the server configuration.
    pub fn server(&self) -> &ServerConfig {
        &self.config.server
    }

    /// Consumes the loader, returning the calculation settings.
    pub fn into_settings(self) -> Settings {
        self.config.settings
    }
}
