//! Error types for the ExtraHop metrics client.

use hophop_core::ProjectionError;

/// Result type for client operations.
pub type HopResult<T> = Result<T, HopError>;

/// Error types that can occur when talking to an ExtraHop appliance.
#[derive(Debug, thiserror::Error)]
pub enum HopError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Appliance answered with a status other than 200.
    #[error("Response Code {status}: {body}")]
    Api { status: u16, body: String },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request serialization or response decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response could not be mapped onto data points.
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
}

impl HopError {
    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Status code of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the appliance rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
