use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::{debug, error, info, instrument};

use crate::config::{get_config_path, AppConfig};
use crate::errors::Error;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

/// Execute the config command
#[instrument]
pub fn execute(cmd: &ConfigCommands) -> Result<(), Error> {
    match cmd {
        ConfigCommands::Init { path, force } => {
            let config_path = init_config(path.as_deref(), *force)?;
            println!("Configuration initialized at {:?}", config_path);
            Ok(())
        }
        ConfigCommands::Show { path } => {
            println!("{}", show_config(path.as_deref())?);
            Ok(())
        }
    }
}

/// Writes the default configuration and returns where it was written.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf, Error> {
    let config_path = get_config_path(path);
    debug!(message = "Initializing configuration", path = ?config_path);

    if config_path.exists() && !force {
        let err = Error::Config(format!(
            "Configuration file already exists at {:?}",
            config_path
        ));
        error!(
            message = "Configuration file already exists",
            path = ?config_path,
            error = ?err
        );
        return Err(err);
    }

    AppConfig::default().save(&config_path)?;
    info!(message = "Configuration initialized", path = ?config_path);
    Ok(config_path)
}

/// The effective configuration as TOML. Defaults are shown when no file exists.
pub fn show_config(path: Option<&Path>) -> Result<String, Error> {
    let config_path = get_config_path(path);
    let config = AppConfig::load_or_default(&config_path)?;
    toml::to_string_pretty(&config)
        .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
}
