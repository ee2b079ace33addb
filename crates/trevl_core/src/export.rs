//! Text export of documents.
//!
//! Documents can be written as pretty-printed JSON or as YAML, and parsed
//! back from either. Parsing an exported document yields an equal document.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{TrevlError, TrevlResult};

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;

/// Supported text formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    /// Picks a format from a file extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            _ => None,
        }
    }

    /// Writes `document` in this format.
    pub fn render(self, document: &Value) -> TrevlResult<String> {
        match self {
            ExportFormat::Json => to_json_string(document),
            ExportFormat::Yaml => to_yaml_string(document),
        }
    }

    /// Parses `text` in this format.
    pub fn parse(self, text: &str) -> TrevlResult<Value> {
        match self {
            ExportFormat::Json => from_json_str(text),
            ExportFormat::Yaml => from_yaml_str(text),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(format!("unsupported format '{}', expected json or yaml", other)),
        }
    }
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_json_string(document: &Value) -> TrevlResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| TrevlError::ExportError {
        format: "json".to_string(),
        reason: e.to_string(),
    })
}

/// YAML without anchors or aliases.
pub fn to_yaml_string(document: &Value) -> TrevlResult<String> {
    serde_yaml::to_string(document).map_err(|e| TrevlError::ExportError {
        format: "yaml".to_string(),
        reason: e.to_string(),
    })
}

pub fn from_json_str(text: &str) -> TrevlResult<Value> {
    serde_json::from_str(text).map_err(|e| TrevlError::ParseError {
        format: "json".to_string(),
        reason: e.to_string(),
    })
}

pub fn from_yaml_str(text: &str) -> TrevlResult<Value> {
    serde_yaml::from_str(text).map_err(|e| TrevlError::ParseError {
        format: "yaml".to_string(),
        reason: e.to_string(),
    })
}
