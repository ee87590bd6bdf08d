//! Single mutating steps and the dry-run gate

use crate::error::ItemError;
use crate::progress::{ProgressEvent, ProgressSink};
use serde::Serialize;
use std::future::Future;
use strato_cloud::ResourceRef;

/// What a step does to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Delete,
    /// Detach a floating IP from its router
    Unassign,
    /// Clear a volume's group reference
    Ungroup,
}

/// A mutating call against one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub action: StepAction,
    pub target: ResourceRef,
}

impl Step {
    pub fn delete(target: &ResourceRef) -> Self {
        Self {
            action: StepAction::Delete,
            target: target.clone(),
        }
    }

    pub fn unassign(target: &ResourceRef) -> Self {
        Self {
            action: StepAction::Unassign,
            target: target.clone(),
        }
    }

    pub fn ungroup(target: &ResourceRef) -> Self {
        Self {
            action: StepAction::Ungroup,
            target: target.clone(),
        }
    }

    /// Present-progressive form, e.g. "Deleting load balancer [lb-1]"
    pub fn progressive(&self) -> String {
        match self.action {
            StepAction::Delete => format!("Deleting {}", self.target),
            StepAction::Unassign => format!("Unassigning {}", self.target),
            StepAction::Ungroup => format!("Removing {} from its volume group", self.target),
        }
    }
}

/// Imperative form, e.g. "delete load balancer [lb-1]"
impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            StepAction::Delete => write!(f, "delete {}", self.target),
            StepAction::Unassign => write!(f, "unassign {}", self.target),
            StepAction::Ungroup => write!(f, "remove {} from its volume group", self.target),
        }
    }
}

/// Whether a gated step actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gated {
    Executed,
    Previewed,
}

/// Applies the same preview semantics to every mutating step
///
/// In dry-run mode the step is announced as "Would ..." and the action is
/// never invoked. Otherwise the action runs, including its own completion
/// wait, and its result is propagated.
pub struct DryRunGate<'a> {
    dry_run: bool,
    progress: &'a dyn ProgressSink,
}

impl<'a> DryRunGate<'a> {
    pub fn new(dry_run: bool, progress: &'a dyn ProgressSink) -> Self {
        Self { dry_run, progress }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn run<F, Fut>(&self, step: &Step, action: F) -> Result<Gated, ItemError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ItemError>>,
    {
        if self.dry_run {
            self.progress.emit(ProgressEvent::Previewed(step.clone()));
            return Ok(Gated::Previewed);
        }

        self.progress.emit(ProgressEvent::Executing(step.clone()));
        action().await?;
        Ok(Gated::Executed)
    }
}
