//! Error types for building and serializing dashboards.

use thiserror::Error;
use trevl_config::ConfigError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while building queries, components and dashboards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrevlError {
    /// Failure inside the display configuration engine (unknown keyword,
    /// structural conflict, kind hierarchy problems).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A field reference was requested for a name the query does not declare.
    #[error("Field '{field}' not found in query for {source_name}. Available fields: {}", .available.join(", "))]
    UnknownField {
        field: String,
        source_name: String,
        available: Vec<String>,
    },

    /// A query declares neither measures nor dimensions.
    #[error("Query for {source_name} must have at least one measure or one dimension")]
    MissingQueryFields { source_name: String },

    /// A filter has neither values nor a parameter.
    #[error("Filter on '{member}' must have either values or a parameter")]
    InvalidFilter { member: String },

    /// A keyword argument needed a default from the query, but the query has
    /// no field of the required role.
    #[error("{kind} needs a default for '{argument}' but the query has no {role}")]
    NoDefaultField {
        kind: String,
        argument: String,
        role: String,
    },

    /// A keyword argument without a default was not supplied.
    #[error("{kind} requires keyword argument '{argument}'")]
    MissingArgument { kind: String, argument: String },

    /// A raw component document is missing required structure.
    #[error("Invalid raw component: {reason}")]
    InvalidRawComponent { reason: String },

    /// A dashboard definition entry is well-formed but incomplete or
    /// contradictory.
    #[error("Invalid dashboard definition: {reason}")]
    InvalidDefinition { reason: String },

    /// Text could not be parsed into a document.
    #[error("Failed to parse {format} document: {reason}")]
    ParseError { format: String, reason: String },

    /// A document could not be written out as text.
    #[error("Failed to write {format} document: {reason}")]
    ExportError { format: String, reason: String },
}

/// Result type alias for dashboard building operations.
pub type TrevlResult<T> = Result<T, TrevlError>;
