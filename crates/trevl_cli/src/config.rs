//! Configuration management for the TREVL CLI.
//!
//! The configuration is stored in TOML format and can be loaded from a
//! specified file path or from `trevl.toml` in the current directory.
//! Secrets are never stored in the file; it only names the environment
//! variables that hold them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trevl_core::ExportFormat;
use xmiddle_client::config::{
    BASE_URL_VAR, CUBE_SECRET_VAR, CUBE_SERVER_VAR, DEFAULT_USERNAME, PASSWORD_VAR,
};
use xmiddle_client::{CubeConfig, ServiceConfig};

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "trevl.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Main configuration structure for the TREVL CLI application.
///
/// # Example TOML Configuration
///
/// ```toml
/// [service]
/// base_url = "https://x-middle.example.com/api"
/// username = "trevl"
/// password_env = "X_MIDDLE_PASSWORD"
///
/// [cube]
/// server = "https://cube.example.com"
/// secret_env = "CUBE_SECRET"
///
/// [output]
/// format = "yaml"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub cube: CubeSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// Settings for the rendering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Base of the dashboard API. `X_MIDDLE_BASEURL` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "ServiceSection::default_username")]
    pub username: String,

    /// Name of the environment variable holding the basic-auth password.
    #[serde(default = "ServiceSection::default_password_env")]
    pub password_env: String,
}

impl ServiceSection {
    fn default_username() -> String {
        DEFAULT_USERNAME.to_string()
    }

    fn default_password_env() -> String {
        PASSWORD_VAR.to_string()
    }
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            base_url: None,
            username: Self::default_username(),
            password_env: Self::default_password_env(),
        }
    }
}

/// Settings for the query-execution service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeSection {
    /// Server URL. `CUBE_SERVER` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Name of the environment variable holding the API secret.
    #[serde(default = "CubeSection::default_secret_env")]
    pub secret_env: String,
}

impl CubeSection {
    fn default_secret_env() -> String {
        CUBE_SECRET_VAR.to_string()
    }
}

impl Default for CubeSection {
    fn default() -> Self {
        Self {
            server: None,
            secret_env: Self::default_secret_env(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: ExportFormat,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read, or
    /// does not contain a valid configuration.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))
    }

    /// Loads the file at `path` if it exists, the default configuration otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file, creating parent directories
    /// as needed and overwriting an existing file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write configuration file: {}", e)))?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Combines the file settings with the environment, read through `lookup`.
    ///
    /// Environment variables override the file. Empty values count as unset.
    pub fn service_config<F>(&self, lookup: F) -> Result<ServiceConfig, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let base_url = get(BASE_URL_VAR)
            .or_else(|| self.service.base_url.clone())
            .ok_or_else(|| {
                Error::Config(format!(
                    "No rendering service configured; set {} or [service] base_url",
                    BASE_URL_VAR
                ))
            })?;

        let mut config = ServiceConfig::new(base_url).with_username(self.service.username.clone());
        if let Some(password) = get(&self.service.password_env) {
            config = config.with_password(password);
        }

        let server = get(CUBE_SERVER_VAR).or_else(|| self.cube.server.clone());
        if let (Some(server), Some(secret)) = (server, get(&self.cube.secret_env)) {
            config = config.with_cube(CubeConfig::new(server, secret));
        }

        Ok(config)
    }
}

/// Returns the configuration file path to use.
pub fn get_config_path(config_path: Option<&Path>) -> PathBuf {
    match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            current_dir.join(DEFAULT_CONFIG_FILENAME)
        }
    }
}
