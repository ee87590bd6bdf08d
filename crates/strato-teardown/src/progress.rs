//! Progress events emitted while a teardown runs
//!
//! The orchestrator never prints. It emits owned [`ProgressEvent`]s to a
//! [`ProgressSink`] and the caller decides how to render them.

use crate::phase::Phase;
use crate::report::TeardownSummary;
use crate::step::Step;
use strato_cloud::ResourceRef;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    PhaseStarted {
        phase: Phase,
    },
    /// A mutating call is about to be issued
    Executing(Step),
    /// Dry-run preview of a step
    Previewed(Step),
    ItemFailed {
        step: Step,
        error: String,
    },
    /// Still listed after the phase executed
    Leftovers {
        phase: Phase,
        resources: Vec<ResourceRef>,
    },
    VerificationSkipped {
        phase: Phase,
        reason: String,
    },
    ContainerAlreadyDeleted {
        vpc_id: String,
    },
    Finished {
        vpc_id: String,
        summary: TeardownSummary,
    },
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::PhaseStarted { phase } => write!(
                f,
                "Phase {}/{}: {}",
                phase.number(),
                Phase::ALL.len(),
                phase
            ),
            ProgressEvent::Executing(step) => f.write_str(&step.progressive()),
            ProgressEvent::Previewed(step) => write!(f, "Would {}", step),
            ProgressEvent::ItemFailed { step, error } => {
                write!(f, "Failed to {}: {}", step, error)
            }
            ProgressEvent::Leftovers { phase, resources } => {
                let ids: Vec<_> = resources.iter().map(|r| r.to_string()).collect();
                write!(f, "{} still present: {}", phase, ids.join(", "))
            }
            ProgressEvent::VerificationSkipped { phase, reason } => {
                write!(f, "Could not verify {}: {}", phase, reason)
            }
            ProgressEvent::ContainerAlreadyDeleted { vpc_id } => {
                write!(f, "VPC [{}] is already deleted", vpc_id)
            }
            ProgressEvent::Finished { vpc_id, summary } => {
                write!(f, "Teardown of VPC [{}] finished: {}", vpc_id, summary)
            }
        }
    }
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: ProgressEvent) {}
}
