//! Control-plane error types

use crate::model::ResourceKind;
use thiserror::Error;

/// Errors returned by the resource service
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),

    #[error("{kind} does not support patching")]
    PatchUnsupported { kind: ResourceKind },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether the service reported that the addressed object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
