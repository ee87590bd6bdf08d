//! Resource service capabilities
//!
//! The control plane is consumed through two small traits instead of one wide
//! client: [`ResourceApi`] is implemented once per resource kind and
//! [`TaskApi`] resolves task handles. [`CloudServices`] composes a full set.

use crate::error::{CloudError, Result};
use crate::model::{ListFilter, Operation, PatchFields, Resource, ResourceKind, ResourceRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Verbs available for a single resource kind
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// The kind this capability operates on
    fn kind(&self) -> ResourceKind;

    /// List resources matching a single-property filter
    async fn list(&self, filter: &ListFilter) -> Result<Vec<ResourceRef>>;

    /// Fetch a resource by id; a missing resource is [`CloudError::NotFound`]
    async fn get(&self, id: &str) -> Result<Resource>;

    /// Delete a resource, returning its task handle when the service issues one
    async fn delete(&self, id: &str) -> Result<Option<Operation>>;

    /// Update a subset of fields
    async fn patch(&self, id: &str, fields: &PatchFields) -> Result<Option<Operation>> {
        let _ = (id, fields);
        Err(CloudError::PatchUnsupported { kind: self.kind() })
    }
}

/// Task lookup
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn get_task(&self, id: &str) -> Result<Operation>;
}

/// One capability per resource kind plus task lookup
#[derive(Clone)]
pub struct CloudServices {
    tasks: Arc<dyn TaskApi>,
    resources: Vec<Arc<dyn ResourceApi>>,
}

impl CloudServices {
    /// Build a complete set; `factory` is called once for every [`ResourceKind`]
    pub fn new<F>(tasks: Arc<dyn TaskApi>, mut factory: F) -> Self
    where
        F: FnMut(ResourceKind) -> Arc<dyn ResourceApi>,
    {
        let resources = ResourceKind::ALL.iter().map(|kind| factory(*kind)).collect();
        Self { tasks, resources }
    }

    pub fn tasks(&self) -> &dyn TaskApi {
        self.tasks.as_ref()
    }

    pub fn resource(&self, kind: ResourceKind) -> &dyn ResourceApi {
        self.resources[kind.index()].as_ref()
    }
}

impl std::fmt::Debug for CloudServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudServices")
            .field("kinds", &self.resources.len())
            .finish()
    }
}
