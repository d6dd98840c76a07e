//! Configuration types for the ExtraHop metrics client.

use std::time::Duration;
use url::Url;

/// Path segment every REST API v1 resource lives under.
pub const API_PREFIX: &str = "api/v1";

/// Configuration for the ExtraHop client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the appliance, e.g. `https://extrahop.example.com`.
    pub base_url: Url,
    /// REST API key.
    pub api_key: String,
    /// Request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new configuration for the given appliance and key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: None,
            user_agent: default_user_agent(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("ExtraHop apikey={}", self.api_key)
    }

    /// Full URL of an API resource, `{base}/api/v1/{path}`.
    pub fn resource_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        ))
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("hophop/{}", env!("CARGO_PKG_VERSION"))
}
