//! Configuration engine error types.
//!
//! Errors raised while addressing, inserting into, merging, or composing
//! display documents.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised by the document engine.
///
/// All of these are raised synchronously at the point of detection. An
/// operation that fails never hands back a partially built document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A keyword argument is not part of the kind's resolved keyword mapping.
    #[error("{kind} received unknown keyword argument '{keyword}'. Supported arguments are: {}", .valid.join(", "))]
    UnknownKeyword {
        kind: String,
        keyword: String,
        valid: Vec<String>,
    },

    /// Insertion or merge met two container shapes that cannot be combined.
    #[error("Structural conflict at '{path}': expected {expected}, found {found}")]
    StructuralConflict {
        path: String,
        expected: String,
        found: String,
    },

    /// A sequence index skips past the end of the sequence.
    #[error("Index {index} out of sequence at '{path}': sequence has {len} element(s), only overwrite or append is supported")]
    UnsupportedIndex {
        path: String,
        index: usize,
        len: usize,
    },

    /// A kind's parent chain loops back on itself.
    #[error("Cyclic kind hierarchy: {}", .chain.join(" -> "))]
    CyclicHierarchy { chain: Vec<String> },

    /// Composition was asked to resolve a chain with no kinds in it.
    #[error("Cannot compose an empty kind chain")]
    EmptyChain,

    /// A kind (or the parent a kind refers to) is not registered.
    #[error("Unknown component kind: {name}")]
    UnknownKind { name: String },

    /// A default display fragment is not a mapping document.
    #[error("Invalid default display for kind '{kind}': {reason}")]
    InvalidDefault { kind: String, reason: String },
}

impl ConfigError {
    /// Returns `true` for the errors that come from mismatched document shapes.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ConfigError::StructuralConflict { .. } | ConfigError::UnsupportedIndex { .. }
        )
    }
}

/// Result type alias for document engine operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
