use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trevl_cli::commands::{
    config_cmd::{self, ConfigCommands},
    export_cmd::{self, ExportArgs},
    kinds_cmd::{self, KindsCommands},
    render_cmd::{self, RenderArgs},
};
use trevl_cli::config::{get_config_path, AppConfig};
use trevl_cli::errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// TREVL CLI: Build dashboard configurations from declarative definitions
#[derive(Parser)]
#[command(name = "trevl")]
#[command(about = "Build dashboard configurations from declarative definitions", long_about = None)]
struct Cli {
    /// Path to the CLI configuration file (defaults to ./trevl.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard document built from a definition file
    Export(ExportArgs),

    /// Render a dashboard through the rendering service
    Render(RenderArgs),

    /// Inspect component kinds
    #[command(subcommand)]
    Kinds(KindsCommands),

    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show the CLI version
    Version,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, Error> {
    AppConfig::load_or_default(&get_config_path(path.map(PathBuf::as_path)))
}

async fn run(cli: Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Export(args) => export_cmd::execute(args, &load_config(cli.config.as_ref())?),
        Commands::Render(args) => {
            render_cmd::execute(args, &load_config(cli.config.as_ref())?).await
        }
        Commands::Kinds(cmd) => kinds_cmd::execute(cmd),
        Commands::Config(cmd) => config_cmd::execute(cmd),
        Commands::Version => {
            println!(
                "trevl version {}",
                option_env!("TREVL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("TREVL_LOG"))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
