//! HTTP transport layer for the ExtraHop REST API.

use crate::config::ClientConfig;
use crate::error::{HopError, HopResult};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
///
/// Every call issues exactly one request. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> HopResult<Self> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&config.authorization())
            .map_err(|_| HopError::Config("Invalid API key format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given resource path.
    fn build_url(&self, path: &str) -> HopResult<url::Url> {
        self.config.resource_url(path).map_err(HopError::InvalidUrl)
    }

    /// Send one request and fail on anything but `200 OK`.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> HopResult<Response> {
        let url = self.build_url(path)?;
        debug!(method = %method, url = %url, "ExtraHop request");

        let mut request = self.client.request(method, url);
        if let Some(payload) = payload {
            request = request.body(serde_json::to_vec(payload)?);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "ExtraHop response");

        if status != StatusCode::OK {
            let body = response.text().await?;
            warn!(status = status.as_u16(), path, "ExtraHop request failed");
            return Err(HopError::from_response(status.as_u16(), body));
        }

        Ok(response)
    }

    /// Send a request and decode the JSON response into `T`.
    pub async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> HopResult<T> {
        let response = self.execute(method, path, payload).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request whose response body is not needed.
    ///
    /// The body is drained without decoding so the connection can be reused.
    pub async fn send_no_response<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> HopResult<()> {
        let response = self.execute(method, path, payload).await?;
        response.bytes().await?;
        Ok(())
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> HopResult<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Execute a POST request without a response body.
    pub async fn post_no_response<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> HopResult<()> {
        self.send_no_response(Method::POST, path, Some(body)).await
    }
}
