use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{debug, info, instrument};
use trevl_core::{DashboardDefinition, ExportFormat};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "export_cmd_tests.rs"]
mod tests;

/// Arguments for the export command
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Dashboard definition file (.yaml, .yml or .json)
    pub file: PathBuf,

    /// Output format; defaults to the configured format
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Reads and parses a dashboard definition, picking the format from the
/// file extension.
pub fn load_definition(path: &Path) -> Result<DashboardDefinition, Error> {
    let format = ExportFormat::from_path(path).ok_or_else(|| {
        Error::InvalidArguments(format!(
            "Cannot tell the format of {:?}; use a .yaml, .yml or .json file",
            path
        ))
    })?;
    let text = fs::read_to_string(path).map_err(|e| Error::file(path, e))?;
    debug!(path = ?path, format = %format, "Parsing dashboard definition");
    Ok(DashboardDefinition::parse(&text, format)?)
}

/// Builds the dashboard described by `args.file` and renders it as text.
#[instrument(skip(config))]
pub fn export_dashboard(args: &ExportArgs, config: &AppConfig) -> Result<String, Error> {
    let definition = load_definition(&args.file)?;
    let dashboard = definition.build()?;
    let format = args.format.unwrap_or(config.output.format);

    info!(
        components = dashboard.len(),
        format = %format,
        "Exporting dashboard"
    );
    Ok(format.render(&dashboard.serialize()?)?)
}

/// Execute the export command
pub fn execute(args: &ExportArgs, config: &AppConfig) -> Result<(), Error> {
    let text = export_dashboard(args, config)?;
    match &args.output {
        Some(path) => {
            fs::write(path, text).map_err(|e| Error::file(path, e))?;
            println!("Dashboard written to {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
