//! HTTP client error types

use strato_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),

    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl From<ApiError> for CloudError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => CloudError::Transport(e.to_string()),
            ApiError::Status { .. } => CloudError::Api(err.to_string()),
            ApiError::Decode(e) => CloudError::Json(e),
            ApiError::MissingEnvVar(name) => CloudError::MissingEnvVar(name),
            ApiError::InvalidEndpoint { .. } => CloudError::InvalidConfig(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
