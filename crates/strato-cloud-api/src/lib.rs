//! HTTP implementation of the Strato control-plane capabilities
//!
//! [`connect`] builds a full [`CloudServices`] set backed by one shared
//! [`StratoClient`]: one [`KindClient`] per resource kind, and the client
//! itself for task lookups.

pub mod client;
pub mod error;
pub mod resource;

pub use client::{ApiConfig, DEFAULT_ENDPOINT, Reply, StratoClient, TOKEN_ENV};
pub use error::{ApiError, Result};
pub use resource::{KindClient, collection_path};

use std::sync::Arc;
use strato_cloud::{CloudServices, ResourceApi};

/// Build the capability set for `config`
pub fn connect(config: ApiConfig) -> Result<CloudServices> {
    let client = Arc::new(StratoClient::new(config)?);
    tracing::debug!(endpoint = client.endpoint(), "control-plane client ready");

    Ok(CloudServices::new(client.clone(), |kind| {
        Arc::new(KindClient::new(client.clone(), kind)) as Arc<dyn ResourceApi>
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_cloud::ResourceKind;

    #[test]
    fn test_connect_covers_every_kind() {
        let services = connect(ApiConfig::new("https://api.example.test/v1", "token")).unwrap();
        for kind in ResourceKind::ALL {
            assert_eq!(services.resource(kind).kind(), kind);
        }
    }

    #[test]
    fn test_connect_rejects_bad_endpoint() {
        let err = connect(ApiConfig::new("ftp://api.example.test", "token")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidEndpoint { .. }));
    }
}
