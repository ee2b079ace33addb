//! Connection settings for the rendering and query-execution services.

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{ClientError, ClientResult};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

pub const BASE_URL_VAR: &str = "X_MIDDLE_BASEURL";
pub const PASSWORD_VAR: &str = "X_MIDDLE_PASSWORD";
pub const CUBE_SERVER_VAR: &str = "CUBE_SERVER";
pub const CUBE_SECRET_VAR: &str = "CUBE_SECRET";

/// Username used for HTTP basic auth when none is configured.
pub const DEFAULT_USERNAME: &str = "trevl";

/// Settings for the rendering service and, optionally, the query service.
#[derive(Debug)]
pub struct ServiceConfig {
    /// Base of the dashboard API, without the final `dashboards` segment.
    pub base_url: String,
    pub username: String,
    pub password: Option<SecretString>,
    pub cube: Option<CubeConfig>,
}

/// Settings for the query-execution service.
#[derive(Debug)]
pub struct CubeConfig {
    pub server: String,
    pub secret: SecretString,
}

impl CubeConfig {
    pub fn new(server: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            cube: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    pub fn with_cube(mut self, cube: CubeConfig) -> Self {
        self.cube = Some(cube);
        self
    }

    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }

    /// Reads the settings from the process environment.
    ///
    /// `X_MIDDLE_BASEURL` is required. `X_MIDDLE_PASSWORD` is optional.
    /// `CUBE_SERVER` and `CUBE_SECRET` are optional but must be set together.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let base_url = get(BASE_URL_VAR).ok_or_else(|| missing(BASE_URL_VAR))?;
        let mut config = ServiceConfig::new(base_url);
        if let Some(password) = get(PASSWORD_VAR) {
            config = config.with_password(password);
        }

        config.cube = match (get(CUBE_SERVER_VAR), get(CUBE_SECRET_VAR)) {
            (Some(server), Some(secret)) => Some(CubeConfig::new(server, secret)),
            (Some(_), None) => return Err(missing(CUBE_SECRET_VAR)),
            (None, Some(_)) => return Err(missing(CUBE_SERVER_VAR)),
            (None, None) => None,
        };

        Ok(config)
    }
}

fn missing(name: &str) -> ClientError {
    ClientError::MissingEnvironment {
        name: name.to_string(),
    }
}
