//! Error types for the service clients.

use trevl_core::TrevlError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while talking to the rendering or query services.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The rendering service answered with a non-success status.
    ///
    /// `body` holds the response body, pretty-printed when it is JSON.
    #[error("Rendering failed ({url}, status {status}):\n{body}")]
    RenderFailed {
        url: String,
        status: u16,
        body: String,
    },

    /// The query-execution service answered with a non-success status.
    #[error("Query execution failed ({url}, status {status}):\n{body}")]
    QueryFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Environment variable '{name}' is not set")]
    MissingEnvironment { name: String },

    /// The service answered successfully but the body was not what was expected.
    #[error("Unexpected response: {reason}")]
    InvalidResponse { reason: String },

    /// The dashboard could not be serialized before sending.
    #[error(transparent)]
    Serialization(#[from] TrevlError),
}

impl ClientError {
    /// HTTP status of a failed service call, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RenderFailed { status, .. } | ClientError::QueryFailed { status, .. } => {
                Some(*status)
            }
            ClientError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Pretty-prints a response body when it is JSON, returns it unchanged otherwise.
pub(crate) fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}
