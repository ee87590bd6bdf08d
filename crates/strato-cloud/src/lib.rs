//! Strato control-plane layer
//!
//! This crate describes the control plane as the rest of Strato sees it:
//! a small resource model, one capability trait per resource kind, and the
//! polling primitives used to follow asynchronous operations to completion.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    strato CLI                    │
//! │               (strato vpc teardown)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                strato-teardown                   │
//! │        phases · dry-run gate · confirmation      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 strato-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   trait ResourceApi / trait TaskApi       │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │ wait_until   │  │ task / sync / absence │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │          strato-cloud-api (HTTP client)          │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod model;
pub mod poll;
pub mod service;
pub mod wait;

// Re-exports
pub use error::{CloudError, Result};
pub use model::{
    FilterField, ListFilter, Operation, OperationStatus, PatchFields, Resource, ResourceKind,
    ResourceRef, SyncStatus,
};
pub use poll::{PollConfig, PollStatus, WaitError, wait_until};
pub use service::{CloudServices, ResourceApi, TaskApi};
pub use wait::{Presence, wait_for_absence, wait_for_sync_status, wait_for_task};
