use std::io;
use std::path::PathBuf;

use thiserror::Error;
use trevl_core::TrevlError;
use xmiddle_client::ClientError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the TREVL CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when there are issues with the configuration file,
    /// such as missing required fields, invalid values, or file access problems.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Failed to read a file from, or write it to, the filesystem.
    #[error("Failed to access file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A dashboard definition or component could not be built or serialized.
    #[error(transparent)]
    Dashboard(#[from] TrevlError),

    /// A call to the rendering or query service failed.
    #[error(transparent)]
    Service(#[from] ClientError),
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }
}
