//! Command modules for the TREVL CLI.
//!
//! - `config_cmd`: create and show the CLI configuration file
//! - `export_cmd`: build a dashboard from a definition file and print its document
//! - `kinds_cmd`: inspect the component kind hierarchy
//! - `render_cmd`: send a dashboard to the rendering service

pub mod config_cmd;
pub mod export_cmd;
pub mod kinds_cmd;
pub mod render_cmd;
