use std::path::PathBuf;

use clap::Subcommand;
use tracing::{debug, instrument};
use trevl_config::ConfigurationComposer;
use trevl_core::{builtin_registry, export, TrevlError};

use crate::commands::export_cmd::load_definition;
use crate::errors::Error;

#[cfg(test)]
#[path = "kinds_cmd_tests.rs"]
mod tests;

/// Subcommands for the kinds command
#[derive(Subcommand, Debug)]
pub enum KindsCommands {
    /// List all known component kinds
    List {
        /// Also include the kinds declared in this definition file
        #[arg(short, long)]
        definition: Option<PathBuf>,
    },

    /// Show the resolved configuration of a kind
    Show {
        /// Name of the kind
        name: String,

        /// Also include the kinds declared in this definition file
        #[arg(short, long)]
        definition: Option<PathBuf>,
    },
}

/// Execute the kinds command
#[instrument]
pub fn execute(cmd: &KindsCommands) -> Result<(), Error> {
    match cmd {
        KindsCommands::List { definition } => {
            let composer = composer_for(definition.as_ref())?;
            print!("{}", list_kinds(&composer));
        }
        KindsCommands::Show { name, definition } => {
            let composer = composer_for(definition.as_ref())?;
            print!("{}", describe_kind(&composer, name)?);
        }
    }
    Ok(())
}

fn composer_for(definition: Option<&PathBuf>) -> Result<ConfigurationComposer, Error> {
    match definition {
        Some(path) => Ok(load_definition(path)?.composer()?),
        None => Ok(ConfigurationComposer::new(builtin_registry())),
    }
}

/// One line per kind, sorted by name, with the parent kind if any.
pub fn list_kinds(composer: &ConfigurationComposer) -> String {
    let registry = composer.registry();
    registry
        .names()
        .into_iter()
        .map(|name| match registry.get(&name).and_then(|kind| kind.parent()) {
            Some(parent) => format!("{} ({})\n", name, parent),
            None => format!("{}\n", name),
        })
        .collect()
}

/// Lineage, component type, keyword paths and effective default of a kind.
pub fn describe_kind(composer: &ConfigurationComposer, name: &str) -> Result<String, Error> {
    let resolved = composer.resolve(name).map_err(TrevlError::from)?;
    debug!(kind = name, "Describing kind");

    let mut lines = vec![
        format!("Kind:    {}", resolved.name()),
        format!("Lineage: {}", resolved.lineage().join(" -> ")),
        format!("Type:    {}", resolved.component_type()),
        "Keywords:".to_string(),
    ];
    for (keyword, path) in resolved.keyword_paths() {
        let source = resolved.keyword_source(keyword).unwrap_or(resolved.name());
        lines.push(format!(
            "  {:<16} {:<32} (from {})",
            keyword,
            path.to_string(),
            source
        ));
    }
    lines.push("Default display:".to_string());
    let default = export::to_json_string(resolved.default_display())?;
    lines.extend(default.lines().map(|line| format!("  {}", line)));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
