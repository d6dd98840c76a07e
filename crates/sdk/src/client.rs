//! Main client for the ExtraHop metrics API.

use crate::api::MetricsApi;
use crate::config::{default_user_agent, ClientConfig};
use crate::error::{HopError, HopResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for one ExtraHop appliance.
///
/// Holds no mutable state; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HopClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl HopClient {
    /// Create a client for the appliance at `api_url` with default settings.
    pub fn new(api_url: &str, api_key: impl Into<String>) -> HopResult<Self> {
        Self::builder().base_url(api_url).api_key(api_key).build()
    }

    /// Create a new client builder.
    pub fn builder() -> HopClientBuilder {
        HopClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> HopResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Raw transport, for resources without a typed API.
    pub fn transport(&self) -> &HttpTransport {
        &self.http
    }

    /// Get the metrics API.
    pub fn metrics(&self) -> MetricsApi<'_> {
        MetricsApi::new(self)
    }
}

/// Builder for creating a HopClient.
pub struct HopClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HopClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the base URL of the appliance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the REST API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> HopResult<HopClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| HopError::Config("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .ok_or_else(|| HopError::Config("api_key is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        let config = ClientConfig {
            base_url,
            api_key,
            timeout: self.timeout,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        };

        HopClient::from_config(config)
    }
}

impl Default for HopClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
