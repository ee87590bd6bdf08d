//! The VPC itself

use crate::error::{ItemError, Result, TeardownError};
use crate::orchestrator::PhaseRun;
use crate::progress::ProgressEvent;
use crate::report::Outcome;
use crate::step::{Gated, Step};
use strato_cloud::{ResourceKind, ResourceRef};

/// Re-fetch the VPC and delete it
///
/// A VPC that is already gone counts as deleted. Any other failure here is
/// fatal for the run.
pub(super) async fn vpc(run: &mut PhaseRun<'_>) -> Result<()> {
    let vpc_id = run.ctx.vpc_id.clone();
    let fatal = |source: ItemError| TeardownError::ContainerDeletion {
        vpc_id: vpc_id.clone(),
        source,
    };

    let target = match run.services().resource(ResourceKind::Vpc).get(&vpc_id).await {
        Ok(resource) => resource.reference,
        Err(e) if e.is_not_found() => {
            already_deleted(run, ResourceRef::new(ResourceKind::Vpc, vpc_id.as_str()));
            return Ok(());
        }
        Err(e) => return Err(fatal(ItemError::Lookup(e))),
    };

    let outcome = match run.delete_raw(&target).await {
        Ok(Gated::Executed) => Outcome::Completed,
        Ok(Gated::Previewed) => Outcome::Previewed,
        Err(ItemError::Delete(e)) if e.is_not_found() => {
            already_deleted(run, target);
            return Ok(());
        }
        Err(e) => return Err(fatal(e)),
    };
    run.record_outcome(Step::delete(&target), outcome);
    Ok(())
}

fn already_deleted(run: &mut PhaseRun<'_>, target: ResourceRef) {
    tracing::info!(vpc_id = %target.id, "VPC already deleted");
    run.progress().emit(ProgressEvent::ContainerAlreadyDeleted {
        vpc_id: target.id.clone(),
    });
    run.record_outcome(Step::delete(&target), Outcome::AlreadyDeleted);
}
