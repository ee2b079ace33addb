//! Client for the dashboard rendering service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument};
use trevl_core::{Dashboard, IntoComponent};
use url::Url;

use crate::config::{ServiceConfig, DEFAULT_USERNAME};
use crate::errors::{pretty_body, ClientError, ClientResult};

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

/// Schema version sent with every render request.
pub const SCHEMA_VERSION: &str = "v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra inputs for a render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// A dashboard event, e.g. a click, to evaluate while rendering.
    pub event: Option<Value>,
    /// Current dashboard state, e.g. parameter values.
    pub state: Option<Value>,
}

impl RenderOptions {
    pub fn with_event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }
}

/// Something that turns a dashboard into rendered component options.
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Renders `dashboard` and returns the service's response document.
    ///
    /// The response has a `components` list holding the rendering-engine
    /// options of each component, in dashboard order.
    async fn render(&self, dashboard: &Dashboard, options: &RenderOptions) -> ClientResult<Value>;
}

/// Builds the body of a render request.
pub fn request_body(dashboard: &Dashboard, options: &RenderOptions) -> ClientResult<Value> {
    let mut body = Map::new();
    body.insert("schemaVersion".into(), json!(SCHEMA_VERSION));
    body.insert("abstractConfig".into(), dashboard.serialize()?);
    if let Some(event) = options.event.as_ref().filter(|e| !e.is_null()) {
        body.insert("event".into(), event.clone());
    }
    if let Some(state) = options.state.as_ref().filter(|s| !s.is_null()) {
        body.insert("state".into(), state.clone());
    }
    Ok(Value::Object(body))
}

/// HTTP client for the rendering service.
///
/// Requests go to `<base_url>/dashboards`. HTTP basic auth is used when a
/// password is configured.
#[derive(Debug)]
pub struct XMiddleClient {
    http: Client,
    api_root: String,
    username: String,
    password: Option<SecretString>,
}

impl XMiddleClient {
    /// Creates an unauthenticated client for the API at `base_url`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let api_root = dashboards_url(base_url)?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ClientError::Http {
                url: api_root.clone(),
                source,
            })?;

        Ok(Self {
            http,
            api_root,
            username: DEFAULT_USERNAME.to_string(),
            password: None,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> ClientResult<Self> {
        let mut client = Self::new(&config.base_url)?;
        if let Some(password) = config.password.as_ref().filter(|p| !p.expose_secret().is_empty()) {
            client = client.with_basic_auth(
                config.username.clone(),
                password.expose_secret().to_string(),
            );
        }
        Ok(client)
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// URL of the dashboards endpoint.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn authenticate(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.password {
            Some(password) => request.basic_auth(&self.username, Some(password.expose_secret())),
            None => request,
        }
    }

    /// Queries the service status endpoint.
    #[instrument(skip(self), fields(api_root = %self.api_root))]
    pub async fn status(&self) -> ClientResult<Value> {
        let url = format!("{}/status", self.api_root);
        let response = self
            .authenticate(self.http.get(&url))
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;

        let text = response.text().await.map_err(|source| ClientError::Http {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|_| {
            error!(url = %url, "Status endpoint returned no JSON body");
            ClientError::InvalidResponse {
                reason: format!(
                    "empty or non-JSON body from {}; check the authentication username and password",
                    url
                ),
            }
        })
    }
}

#[async_trait]
impl RenderService for XMiddleClient {
    #[instrument(skip(self, dashboard, options), fields(api_root = %self.api_root, components = dashboard.len()))]
    async fn render(&self, dashboard: &Dashboard, options: &RenderOptions) -> ClientResult<Value> {
        let body = request_body(dashboard, options)?;
        info!("Sending dashboard to rendering service");

        let response = self
            .authenticate(self.http.post(&self.api_root).json(&body))
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: self.api_root.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Rendering service rejected dashboard");
            return Err(ClientError::RenderFailed {
                url: self.api_root.clone(),
                status: status.as_u16(),
                body: pretty_body(&body),
            });
        }

        let rendered: Value = response.json().await.map_err(|e| ClientError::InvalidResponse {
            reason: format!("body from {} is not JSON: {}", self.api_root, e),
        })?;
        debug!(status = status.as_u16(), "Dashboard rendered");
        Ok(rendered)
    }
}

/// Renders a single component and returns its rendered options.
pub async fn render_component(
    service: &dyn RenderService,
    component: impl IntoComponent,
    options: &RenderOptions,
) -> ClientResult<Value> {
    let dashboard = Dashboard::default().with_component(component);
    let mut rendered = service.render(&dashboard, options).await?;

    match rendered.get_mut("components").and_then(Value::as_array_mut) {
        Some(components) if !components.is_empty() => Ok(components.swap_remove(0)),
        _ => Err(ClientError::InvalidResponse {
            reason: "render response has no components".to_string(),
        }),
    }
}

fn dashboards_url(base_url: &str) -> ClientResult<String> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };
    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(format!("{}/dashboards", url.as_str().trim_end_matches('/')))
}
