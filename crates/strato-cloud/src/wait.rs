//! Completion and existence waits built on [`wait_until`]

use crate::model::{OperationStatus, SyncStatus};
use crate::poll::{PollConfig, PollStatus, WaitError, wait_until};
use crate::service::{ResourceApi, TaskApi};

impl PollStatus for OperationStatus {
    fn is_failure(&self) -> bool {
        *self == OperationStatus::Failed
    }
}

impl PollStatus for SyncStatus {
    fn is_failure(&self) -> bool {
        *self == SyncStatus::Error
    }
}

/// Whether a resource can still be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl PollStatus for Presence {}

/// Wait for a task to complete
pub async fn wait_for_task(
    tasks: &dyn TaskApi,
    task_id: &str,
    config: &PollConfig,
) -> Result<(), WaitError> {
    tracing::debug!(task_id, "waiting for task");
    wait_until(
        move || async move { tasks.get_task(task_id).await.map(|op| op.status) },
        OperationStatus::Complete,
        config,
    )
    .await
}

/// Wait for a resource's own status field to reach `target`
///
/// When the target is [`SyncStatus::Deleted`], a not-found answer counts as
/// having reached it.
pub async fn wait_for_sync_status(
    api: &dyn ResourceApi,
    id: &str,
    target: SyncStatus,
    config: &PollConfig,
) -> Result<(), WaitError> {
    tracing::debug!(kind = %api.kind(), id, %target, "waiting for sync status");
    wait_until(
        move || async move {
            match api.get(id).await {
                Ok(resource) => Ok(resource.status.unwrap_or(SyncStatus::Unknown)),
                Err(e) if e.is_not_found() && target == SyncStatus::Deleted => {
                    Ok(SyncStatus::Deleted)
                }
                Err(e) => Err(e),
            }
        },
        target,
        config,
    )
    .await
}

/// Wait for a resource to disappear
///
/// Any fetch error other than not-found is a hard failure.
pub async fn wait_for_absence(
    api: &dyn ResourceApi,
    id: &str,
    config: &PollConfig,
) -> Result<(), WaitError> {
    tracing::debug!(kind = %api.kind(), id, "waiting for resource to disappear");
    wait_until(
        move || async move {
            match api.get(id).await {
                Ok(_) => Ok(Presence::Present),
                Err(e) if e.is_not_found() => Ok(Presence::Absent),
                Err(e) => Err(e),
            }
        },
        Presence::Absent,
        config,
    )
    .await
}
