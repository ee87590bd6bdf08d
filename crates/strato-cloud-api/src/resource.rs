//! Per-kind resource endpoints

use crate::client::{Reply, StratoClient};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use strato_cloud::{
    CloudError, ListFilter, Operation, OperationStatus, PatchFields, Resource, ResourceApi,
    ResourceKind, ResourceRef, SyncStatus, TaskApi,
};

/// Collection path of a resource kind
pub fn collection_path(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Vpc => "vpcs",
        ResourceKind::AffinityRule => "affinity-rules",
        ResourceKind::Instance => "instances",
        ResourceKind::LoadBalancer => "load-balancers",
        ResourceKind::VpnService => "vpn-services",
        ResourceKind::VpnEndpoint => "vpn-endpoints",
        ResourceKind::VpnSession => "vpn-sessions",
        ResourceKind::Router => "routers",
        ResourceKind::Network => "networks",
        ResourceKind::IpAddress => "ip-addresses",
        ResourceKind::NatRule => "nat-rules",
        ResourceKind::FloatingIp => "floating-ips",
        ResourceKind::Volume => "volumes",
        ResourceKind::VolumeGroup => "volume-groups",
        ResourceKind::HostGroup => "host-groups",
        ResourceKind::Host => "hosts",
        ResourceKind::PrivateImage => "private-images",
    }
}

/// [`ResourceApi`] for one kind over the shared client
pub struct KindClient {
    client: Arc<StratoClient>,
    kind: ResourceKind,
}

impl KindClient {
    pub fn new(client: Arc<StratoClient>, kind: ResourceKind) -> Self {
        Self { client, kind }
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", collection_path(self.kind), id)
    }

    fn not_found(&self, id: &str) -> CloudError {
        CloudError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl ResourceApi for KindClient {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list(&self, filter: &ListFilter) -> strato_cloud::Result<Vec<ResourceRef>> {
        let reply: Reply<Vec<ApiResource>> = self
            .client
            .send(
                Method::GET,
                collection_path(self.kind),
                &[(filter.field.as_str(), filter.value.as_str())],
                None,
            )
            .await?;

        // a collection never 404s; that means a wrong route or a missing parent
        let items = match reply {
            Reply::Body(items) => items,
            Reply::Empty => Vec::new(),
            Reply::Missing => {
                return Err(CloudError::Api(format!(
                    "API returned 404 listing {} ({})",
                    self.kind.plural_name(),
                    collection_path(self.kind)
                )));
            }
        };
        tracing::debug!(kind = %self.kind, %filter, count = items.len(), "listed");
        Ok(items
            .into_iter()
            .map(|item| item.into_resource(self.kind).reference)
            .collect())
    }

    async fn get(&self, id: &str) -> strato_cloud::Result<Resource> {
        let reply: Reply<ApiResource> = self
            .client
            .send(Method::GET, &self.item_path(id), &[], None)
            .await?;

        match reply {
            Reply::Body(item) => Ok(item.into_resource(self.kind)),
            Reply::Missing | Reply::Empty => Err(self.not_found(id)),
        }
    }

    async fn delete(&self, id: &str) -> strato_cloud::Result<Option<Operation>> {
        let reply: Reply<ApiTask> = self
            .client
            .send(Method::DELETE, &self.item_path(id), &[], None)
            .await?;

        match reply {
            Reply::Body(task) => Ok(Some(task.into())),
            Reply::Empty => Ok(None),
            Reply::Missing => Err(self.not_found(id)),
        }
    }

    async fn patch(
        &self,
        id: &str,
        fields: &PatchFields,
    ) -> strato_cloud::Result<Option<Operation>> {
        let body = serde_json::Value::Object(fields.clone());
        let reply: Reply<ApiTask> = self
            .client
            .send(Method::PATCH, &self.item_path(id), &[], Some(&body))
            .await?;

        match reply {
            Reply::Body(task) => Ok(Some(task.into())),
            Reply::Empty => Ok(None),
            Reply::Missing => Err(self.not_found(id)),
        }
    }
}

#[async_trait]
impl TaskApi for StratoClient {
    async fn get_task(&self, id: &str) -> strato_cloud::Result<Operation> {
        let reply: Reply<ApiTask> = self
            .send(Method::GET, &format!("tasks/{}", id), &[], None)
            .await?;

        match reply {
            Reply::Body(task) => Ok(task.into()),
            Reply::Missing | Reply::Empty => Err(CloudError::TaskNotFound(id.to_string())),
        }
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResource {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    status: Option<SyncStatus>,
    /// Remaining fields; kept for per-phase filtering
    #[serde(flatten)]
    attributes: HashMap<String, serde_json::Value>,
}

impl ApiResource {
    fn into_resource(self, kind: ResourceKind) -> Resource {
        let reference = ResourceRef {
            id: self.id,
            kind,
            parent_id: self.parent_id,
            name: self.name,
            attributes: self.attributes,
        };
        let resource = Resource::new(reference);
        match self.status {
            Some(status) => resource.with_status(status),
            None => resource,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiTask {
    id: String,
    status: OperationStatus,
    #[serde(default)]
    resource_id: Option<String>,
}

impl From<ApiTask> for Operation {
    fn from(task: ApiTask) -> Self {
        let operation = Operation::new(task.id, task.status);
        match task.resource_id {
            Some(resource_id) => operation.with_resource(resource_id),
            None => operation,
        }
    }
}
