use crate::framework::TransportError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "API_RESOURCE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "API_RESOURCE_TIMEOUT_SECS";
pub const ENV_TOKEN: &str = "API_RESOURCE_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`HttpTransport`](crate::clients::HttpTransport).
///
/// Deserializable so it can sit inside a larger application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Scheme, host and optional path prefix every resource path is appended to.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent as `Authorization: Bearer <token>`.
    pub auth_token: Option<String>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Whole seconds, rounded up so sub-second timeouts stay positive.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    /// Defaults overridden by `API_RESOURCE_*` variables that are set.
    pub fn from_env() -> Result<Self, TransportError> {
        let mut config = Self::default();
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Ok(timeout) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                TransportError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {timeout}"))
            })?;
        }
        if let Ok(token) = env::var(ENV_TOKEN) {
            config.auth_token = Some(token);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), TransportError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| TransportError::Config(format!("base_url `{}`: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::Config(format!(
                "base_url `{}` must be http or https",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(TransportError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
