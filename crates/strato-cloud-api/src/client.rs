//! Strato control-plane HTTP client
//!
//! Every endpoint answers with the same JSON envelope
//! (`{"success": .., "result": .., "errors": [..]}`); requests are
//! authenticated with a bearer token.

use crate::error::{ApiError, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "STRATO_API_TOKEN";

/// Endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://api.strato.cloud/v1";

/// Connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_token: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create ApiConfig for `endpoint` with the token from the environment
    pub fn from_env(endpoint: impl Into<String>) -> Result<Self> {
        let api_token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::MissingEnvVar(TOKEN_ENV.to_string()))?;

        Ok(Self::new(endpoint, api_token))
    }
}

/// Decoded answer to a single request
#[derive(Debug, PartialEq)]
pub enum Reply<T> {
    /// The addressed object does not exist (HTTP 404)
    Missing,
    /// Success without a result
    Empty,
    Body(T),
}

/// Low-level client shared by every resource kind
pub struct StratoClient {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl StratoClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("strato/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full URL for a path relative to the endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Send a request and decode the envelope
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<Reply<T>> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "control-plane request");

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(%url, status = status.as_u16(), "control-plane response");
        decode(status, &text)
    }
}

impl std::fmt::Debug for StratoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StratoClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(ApiError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "expected an http:// or https:// URL".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Interpret a status code and body
pub(crate) fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Reply<T>> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Reply::Missing);
    }
    if status.is_success() && body.trim().is_empty() {
        return Ok(Reply::Empty);
    }

    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ApiError::Decode(e)),
        Err(_) => {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }
    };

    if !status.is_success() || !envelope.success {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: envelope.error_message(),
        });
    }

    Ok(match envelope.result {
        Some(result) => Reply::Body(result),
        None => Reply::Empty,
    })
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

impl<T> ApiResponse<T> {
    fn error_message(&self) -> String {
        self.errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}
