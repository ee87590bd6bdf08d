//! Resource model shared by the service layer and the teardown orchestrator
//!
//! Only the shape needed to decide *what* to delete and *when it is gone* is
//! modelled here. Full resource payloads stay inside the transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute carrying the type of an IP address (`"cluster"`, `"vip"`, ...)
pub const ATTR_IP_TYPE: &str = "type";

/// Attribute carrying a volume's group reference
pub const ATTR_VOLUME_GROUP_ID: &str = "volume_group_id";

/// Attribute carrying the router a floating IP is assigned to
pub const ATTR_ROUTER_ID: &str = "router_id";

/// IP address type that is owned by a network and must go before it
pub const IP_TYPE_CLUSTER: &str = "cluster";

/// Kind of control-plane resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    AffinityRule,
    Instance,
    LoadBalancer,
    VpnService,
    VpnEndpoint,
    VpnSession,
    Router,
    Network,
    IpAddress,
    NatRule,
    FloatingIp,
    Volume,
    VolumeGroup,
    HostGroup,
    Host,
    PrivateImage,
}

impl ResourceKind {
    /// Every kind, in declaration order
    pub const ALL: [ResourceKind; 17] = [
        ResourceKind::Vpc,
        ResourceKind::AffinityRule,
        ResourceKind::Instance,
        ResourceKind::LoadBalancer,
        ResourceKind::VpnService,
        ResourceKind::VpnEndpoint,
        ResourceKind::VpnSession,
        ResourceKind::Router,
        ResourceKind::Network,
        ResourceKind::IpAddress,
        ResourceKind::NatRule,
        ResourceKind::FloatingIp,
        ResourceKind::Volume,
        ResourceKind::VolumeGroup,
        ResourceKind::HostGroup,
        ResourceKind::Host,
        ResourceKind::PrivateImage,
    ];

    /// Position of the kind inside [`ResourceKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human readable singular name
    pub fn display_name(self) -> &'static str {
        match self {
            ResourceKind::Vpc => "VPC",
            ResourceKind::AffinityRule => "affinity rule",
            ResourceKind::Instance => "instance",
            ResourceKind::LoadBalancer => "load balancer",
            ResourceKind::VpnService => "VPN service",
            ResourceKind::VpnEndpoint => "VPN endpoint",
            ResourceKind::VpnSession => "VPN session",
            ResourceKind::Router => "router",
            ResourceKind::Network => "network",
            ResourceKind::IpAddress => "IP address",
            ResourceKind::NatRule => "NAT rule",
            ResourceKind::FloatingIp => "floating IP",
            ResourceKind::Volume => "volume",
            ResourceKind::VolumeGroup => "volume group",
            ResourceKind::HostGroup => "host group",
            ResourceKind::Host => "host",
            ResourceKind::PrivateImage => "private image",
        }
    }

    /// Plural name used in messages such as "failed to get load balancers"
    pub fn plural_name(self) -> String {
        match self {
            ResourceKind::Vpc => "VPCs".to_string(),
            ResourceKind::IpAddress => "IP addresses".to_string(),
            other => format!("{}s", other.display_name()),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Minimal reference to a resource returned by a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Provider-side identifier
    pub id: String,

    /// Resource kind
    pub kind: ResourceKind,

    /// Owning resource (router for a network, VPN service for a session, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Display name, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Listing attributes used for per-phase filtering
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            parent_id: None,
            name: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn get_attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// String attribute, treating an empty string as absent
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.kind, self.id)
    }
}

/// A resource as returned by `get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(flatten)]
    pub reference: ResourceRef,

    /// Sync status, for kinds that carry one
    #[serde(default)]
    pub status: Option<SyncStatus>,
}

impl Resource {
    pub fn new(reference: ResourceRef) -> Self {
        Self {
            reference,
            status: None,
        }
    }

    pub fn with_status(mut self, status: SyncStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Status field carried by resources that have no separate task object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SyncStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    Deleted,
    Error,
    Unknown,
}

impl From<&str> for SyncStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "creating" | "pending_create" | "building" => SyncStatus::Creating,
            "active" | "available" | "running" | "up" => SyncStatus::Active,
            "updating" | "pending_update" => SyncStatus::Updating,
            "deleting" | "pending_delete" => SyncStatus::Deleting,
            "deleted" | "terminated" => SyncStatus::Deleted,
            "error" | "failed" => SyncStatus::Error,
            _ => SyncStatus::Unknown,
        }
    }
}

impl From<String> for SyncStatus {
    fn from(value: String) -> Self {
        SyncStatus::from(value.as_str())
    }
}

impl From<SyncStatus> for String {
    fn from(status: SyncStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Creating => write!(f, "creating"),
            SyncStatus::Active => write!(f, "active"),
            SyncStatus::Updating => write!(f, "updating"),
            SyncStatus::Deleting => write!(f, "deleting"),
            SyncStatus::Deleted => write!(f, "deleted"),
            SyncStatus::Error => write!(f, "error"),
            SyncStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Handle to a server-side asynchronous action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Task identifier
    pub id: String,

    /// Current status
    pub status: OperationStatus,

    /// Entity the operation produced or affected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl Operation {
    pub fn new(id: impl Into<String>, status: OperationStatus) -> Self {
        Self {
            id: id.into(),
            status,
            resource_id: None,
        }
    }

    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }
}

/// Task status, collapsed from the per-service vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl From<&str> for OperationStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "pending" | "queued" | "created" => OperationStatus::Pending,
            "complete" | "completed" | "success" | "succeeded" | "done" => {
                OperationStatus::Complete
            }
            "failed" | "fail" | "failure" | "error" => OperationStatus::Failed,
            // running, in_progress, processing and anything new keep the poller going
            _ => OperationStatus::InProgress,
        }
    }
}

impl From<String> for OperationStatus {
    fn from(value: String) -> Self {
        OperationStatus::from(value.as_str())
    }
}

impl From<OperationStatus> for String {
    fn from(status: OperationStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::InProgress => write!(f, "in_progress"),
            OperationStatus::Complete => write!(f, "complete"),
            OperationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Parent-id property a listing is scoped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    VpcId,
    RouterId,
    NetworkId,
    VpnServiceId,
    HostGroupId,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::VpcId => "vpc_id",
            FilterField::RouterId => "router_id",
            FilterField::NetworkId => "network_id",
            FilterField::VpnServiceId => "vpn_service_id",
            FilterField::HostGroupId => "host_group_id",
        }
    }
}

/// Single-property listing filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub field: FilterField,
    pub value: String,
}

impl ListFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn vpc(id: impl Into<String>) -> Self {
        Self::new(FilterField::VpcId, id)
    }

    pub fn router(id: impl Into<String>) -> Self {
        Self::new(FilterField::RouterId, id)
    }

    pub fn network(id: impl Into<String>) -> Self {
        Self::new(FilterField::NetworkId, id)
    }

    pub fn vpn_service(id: impl Into<String>) -> Self {
        Self::new(FilterField::VpnServiceId, id)
    }

    pub fn host_group(id: impl Into<String>) -> Self {
        Self::new(FilterField::HostGroupId, id)
    }

    /// Whether a listed resource falls inside this filter's scope
    ///
    /// The property is looked up in the resource attributes first and falls
    /// back to `parent_id`.
    pub fn matches(&self, resource: &ResourceRef) -> bool {
        match resource.attribute_str(self.field.as_str()) {
            Some(value) => value == self.value,
            None => resource.parent_id.as_deref() == Some(self.value.as_str()),
        }
    }
}

impl std::fmt::Display for ListFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.field.as_str(), self.value)
    }
}

/// Fields sent with a `patch` call
pub type PatchFields = serde_json::Map<String, serde_json::Value>;

/// Patch that clears a single reference field
pub fn clear_reference(field: &str) -> PatchFields {
    let mut fields = PatchFields::new();
    fields.insert(field.to_string(), serde_json::json!(""));
    fields
}
