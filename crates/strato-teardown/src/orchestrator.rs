//! Teardown orchestrator
//!
//! Runs every [`Phase`] strictly in order against one VPC. Listing failures
//! stop the run; a failing step is recorded and the run moves on.

use crate::error::{ItemError, Result, TeardownError};
use crate::phase::Phase;
use crate::phases;
use crate::progress::{NullProgress, ProgressEvent, ProgressSink};
use crate::report::{Outcome, PhaseReport, TeardownReport};
use crate::step::{DryRunGate, Gated, Step};
use std::sync::Arc;
use std::time::Instant;
use strato_cloud::{
    CloudServices, ListFilter, Operation, PatchFields, PollConfig, ResourceApi, ResourceKind,
    ResourceRef, SyncStatus, wait_for_absence, wait_for_sync_status, wait_for_task,
};
use tracing::{error, info, warn};

/// How completion of a mutating call is observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Poll the returned task
    Task,
    /// Poll the resource's own status field
    SyncStatus(SyncStatus),
    /// Poll until the resource is no longer found
    Existence,
}

impl WaitStrategy {
    /// Strategy used when deleting a resource of `kind`
    pub fn for_deletion(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Instance | ResourceKind::Vpc => WaitStrategy::Existence,
            ResourceKind::Router => WaitStrategy::SyncStatus(SyncStatus::Deleted),
            _ => WaitStrategy::Task,
        }
    }
}

/// Run-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownOptions {
    pub poll: PollConfig,

    /// Re-list each executed phase's resources and report leftovers
    pub verify: bool,
}

impl Default for TeardownOptions {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            verify: true,
        }
    }
}

/// Immutable for the duration of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub vpc_id: String,
    pub dry_run: bool,
}

pub struct Orchestrator {
    services: CloudServices,
    options: TeardownOptions,
    progress: Arc<dyn ProgressSink>,
}

impl Orchestrator {
    pub fn new(services: CloudServices, options: TeardownOptions) -> Self {
        Self {
            services,
            options,
            progress: Arc::new(NullProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &TeardownOptions {
        &self.options
    }

    /// Tear down everything inside `vpc_id`, then the VPC itself
    pub async fn run(&self, vpc_id: &str, dry_run: bool) -> Result<TeardownReport> {
        let ctx = RunContext {
            vpc_id: vpc_id.to_string(),
            dry_run,
        };
        let started = Instant::now();
        let mut report = TeardownReport::new(vpc_id, dry_run);

        info!(vpc_id, dry_run, "starting VPC teardown");

        for phase in Phase::ALL {
            self.progress.emit(ProgressEvent::PhaseStarted { phase });
            let phase_started = Instant::now();

            let mut run = PhaseRun::new(self, &ctx, phase);
            phases::execute(&mut run).await?;
            if !dry_run && self.options.verify {
                run.verify().await;
            }

            let mut phase_report = run.finish();
            phase_report.duration_ms = phase_started.elapsed().as_millis() as u64;
            info!(
                phase = %phase,
                items = phase_report.items.len(),
                failed = phase_report.failures().count(),
                "phase finished"
            );
            report.phases.push(phase_report);
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        self.progress.emit(ProgressEvent::Finished {
            vpc_id: vpc_id.to_string(),
            summary: report.summary(),
        });
        Ok(report)
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("services", &self.services)
            .field("options", &self.options)
            .finish()
    }
}

/// State of one phase while it runs
pub(crate) struct PhaseRun<'a> {
    services: &'a CloudServices,
    poll: &'a PollConfig,
    progress: &'a dyn ProgressSink,
    pub(crate) ctx: &'a RunContext,
    report: PhaseReport,
}

impl<'a> PhaseRun<'a> {
    fn new(orchestrator: &'a Orchestrator, ctx: &'a RunContext, phase: Phase) -> Self {
        Self {
            services: &orchestrator.services,
            poll: &orchestrator.options.poll,
            progress: orchestrator.progress.as_ref(),
            ctx,
            report: PhaseReport::new(phase),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.report.phase
    }

    pub(crate) fn services(&self) -> &'a CloudServices {
        self.services
    }

    fn gate(&self) -> DryRunGate<'a> {
        DryRunGate::new(self.ctx.dry_run, self.progress)
    }

    /// Filtered listing; failure is fatal for the run
    pub(crate) async fn list(
        &self,
        kind: ResourceKind,
        filter: ListFilter,
    ) -> Result<Vec<ResourceRef>> {
        self.services
            .resource(kind)
            .list(&filter)
            .await
            .map_err(|source| TeardownError::Listing {
                phase: self.phase(),
                what: kind.plural_name(),
                source,
            })
    }

    /// Resources of `kind` scoped to the VPC under teardown
    pub(crate) async fn list_in_vpc(&self, kind: ResourceKind) -> Result<Vec<ResourceRef>> {
        self.list(kind, ListFilter::vpc(self.ctx.vpc_id.as_str()))
            .await
    }

    /// Delete one resource, recording the outcome; never fails the run
    pub(crate) async fn delete_one(&mut self, target: &ResourceRef) {
        let step = Step::delete(target);
        let result = self.delete_raw(target).await;
        self.record(step, result);
    }

    /// Delete each candidate in listing order
    pub(crate) async fn delete_all(&mut self, targets: &[ResourceRef]) {
        for target in targets {
            self.delete_one(target).await;
        }
    }

    /// Patch one resource, recording the outcome; never fails the run
    pub(crate) async fn patch_one(&mut self, step: Step, fields: PatchFields) {
        let api = self.services.resource(step.target.kind);
        let services = self.services;
        let poll = self.poll;
        let id = step.target.id.clone();

        let result = self
            .gate()
            .run(&step, || async move {
                let operation = api.patch(&id, &fields).await.map_err(ItemError::Patch)?;
                match operation {
                    Some(op) => wait_for_task(services.tasks(), &op.id, poll).await?,
                    None => tracing::debug!(id = %id, "patch returned no task; not waiting"),
                }
                Ok(())
            })
            .await;
        self.record(step, result);
    }

    /// Gated delete plus completion wait, without recording
    pub(crate) async fn delete_raw(
        &self,
        target: &ResourceRef,
    ) -> std::result::Result<Gated, ItemError> {
        let step = Step::delete(target);
        let api = self.services.resource(target.kind);
        let services = self.services;
        let poll = self.poll;

        self.gate()
            .run(&step, || async move {
                let operation = api.delete(&target.id).await.map_err(ItemError::Delete)?;
                await_completion(services, api, &target.id, operation, poll).await
            })
            .await
    }

    /// Record an outcome without issuing any call
    pub(crate) fn record_outcome(&mut self, step: Step, outcome: Outcome) {
        self.report.record(step, outcome);
    }

    pub(crate) fn progress(&self) -> &'a dyn ProgressSink {
        self.progress
    }

    fn record(&mut self, step: Step, result: std::result::Result<Gated, ItemError>) {
        let outcome = match result {
            Ok(Gated::Executed) => Outcome::Completed,
            Ok(Gated::Previewed) => Outcome::Previewed,
            // gone between listing and deletion
            Err(ItemError::Delete(e)) if e.is_not_found() => {
                info!(phase = %self.phase(), target = %step.target, "already deleted");
                Outcome::AlreadyDeleted
            }
            Err(e) => {
                error!(phase = %self.phase(), target = %step.target, error = %e, "failed to {}", step);
                self.progress.emit(ProgressEvent::ItemFailed {
                    step: step.clone(),
                    error: e.to_string(),
                });
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        self.report.record(step, outcome);
    }

    /// Re-list the phase's kinds and report what is still there
    async fn verify(&mut self) {
        let phase = self.phase();
        for kind in phase.verified_kinds() {
            match self.list_in_vpc(*kind).await {
                Ok(remaining) if remaining.is_empty() => {}
                Ok(remaining) => {
                    warn!(phase = %phase, kind = %kind, count = remaining.len(), "resources left behind");
                    self.progress.emit(ProgressEvent::Leftovers {
                        phase,
                        resources: remaining.clone(),
                    });
                    self.report.leftovers.extend(remaining);
                }
                Err(e) => {
                    warn!(phase = %phase, error = %e, "verification listing failed");
                    self.progress.emit(ProgressEvent::VerificationSkipped {
                        phase,
                        reason: e.to_string(),
                    });
                    self.report.warnings.push(e.to_string());
                }
            }
        }
    }

    fn finish(self) -> PhaseReport {
        self.report
    }
}

/// Wait for a delete to take effect using the kind's [`WaitStrategy`]
///
/// A task-awaited delete that returned no task falls back to waiting for the
/// resource to disappear.
async fn await_completion(
    services: &CloudServices,
    api: &dyn ResourceApi,
    id: &str,
    operation: Option<Operation>,
    poll: &PollConfig,
) -> std::result::Result<(), ItemError> {
    match (WaitStrategy::for_deletion(api.kind()), operation) {
        (WaitStrategy::Task, Some(op)) => wait_for_task(services.tasks(), &op.id, poll).await?,
        (WaitStrategy::Task, None) => {
            tracing::debug!(kind = %api.kind(), id, "delete returned no task; waiting for absence");
            wait_for_absence(api, id, poll).await?
        }
        (WaitStrategy::SyncStatus(target), _) => {
            wait_for_sync_status(api, id, target, poll).await?
        }
        (WaitStrategy::Existence, _) => wait_for_absence(api, id, poll).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_strategies() {
        assert_eq!(
            WaitStrategy::for_deletion(ResourceKind::Instance),
            WaitStrategy::Existence
        );
        assert_eq!(
            WaitStrategy::for_deletion(ResourceKind::Vpc),
            WaitStrategy::Existence
        );
        assert_eq!(
            WaitStrategy::for_deletion(ResourceKind::Router),
            WaitStrategy::SyncStatus(SyncStatus::Deleted)
        );
        assert_eq!(
            WaitStrategy::for_deletion(ResourceKind::LoadBalancer),
            WaitStrategy::Task
        );
        assert_eq!(
            WaitStrategy::for_deletion(ResourceKind::NatRule),
            WaitStrategy::Task
        );
    }

    #[test]
    fn test_default_options_verify() {
        let options = TeardownOptions::default();
        assert!(options.verify);
        assert_eq!(options.poll, PollConfig::default());
    }
}
