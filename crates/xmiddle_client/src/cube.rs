//! Client for the query-execution service.
//!
//! Queries are posted to `<server>/cubejs-api/v1/load` with the secret as
//! the `Authorization` header. Computed fields are stripped before sending;
//! they are evaluated by the rendering service only.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument};
use trevl_core::Query;

use crate::config::CubeConfig;
use crate::errors::{pretty_body, ClientError, ClientResult};

#[cfg(test)]
#[path = "cube_tests.rs"]
mod tests;

const LOAD_PATH: &str = "cubejs-api/v1/load";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct CubeClient {
    http: Client,
    load_url: String,
    secret: SecretString,
}

impl CubeClient {
    pub fn new(server: &str, secret: impl Into<String>) -> ClientResult<Self> {
        let load_url = format!("{}/{}", server.trim_end_matches('/'), LOAD_PATH);
        url::Url::parse(&load_url).map_err(|e| ClientError::InvalidUrl {
            url: server.to_string(),
            reason: e.to_string(),
        })?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Http {
                url: load_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            load_url,
            secret: SecretString::from(secret.into()),
        })
    }

    pub fn from_config(config: &CubeConfig) -> ClientResult<Self> {
        Self::new(&config.server, config.secret.expose_secret().to_string())
    }

    pub fn load_url(&self) -> &str {
        &self.load_url
    }

    /// Executes `query` and returns its result rows.
    #[instrument(skip(self, query), fields(load_url = %self.load_url))]
    pub async fn load(&self, query: &Query) -> ClientResult<Vec<Map<String, Value>>> {
        let body = json!({"query": query.serialize_for_execution()});
        info!("Executing query");

        let response = self
            .http
            .post(&self.load_url)
            .header(reqwest::header::AUTHORIZATION, self.secret.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: self.load_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Query execution failed");
            return Err(ClientError::QueryFailed {
                url: self.load_url.clone(),
                status: status.as_u16(),
                body: pretty_body(&body),
            });
        }

        let document: Value = response.json().await.map_err(|e| ClientError::InvalidResponse {
            reason: format!("body from {} is not JSON: {}", self.load_url, e),
        })?;
        rows(document)
    }
}

fn rows(document: Value) -> ClientResult<Vec<Map<String, Value>>> {
    let Some(Value::Array(data)) = document.get("data").cloned() else {
        return Err(ClientError::InvalidResponse {
            reason: "query response has no 'data' list".to_string(),
        });
    };
    data.into_iter()
        .map(|row| match row {
            Value::Object(row) => Ok(row),
            other => Err(ClientError::InvalidResponse {
                reason: format!("query row is not a mapping: {}", other),
            }),
        })
        .collect()
}
