//! Structured results of a teardown run

use crate::phase::Phase;
use crate::step::Step;
use chrono::{DateTime, Utc};
use serde::Serialize;
use strato_cloud::ResourceRef;

/// How a single step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// Mutating call issued and its completion observed
    Completed,
    /// Dry-run: the step was only reported
    Previewed,
    /// The resource was already gone
    AlreadyDeleted,
    /// The call or its completion wait failed
    Failed { error: String },
}

/// Result of a single step
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub step: Step,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ItemOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// Result of one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,

    /// Outcomes in execution order
    pub items: Vec<ItemOutcome>,

    /// Resources still listed after the phase executed
    pub leftovers: Vec<ResourceRef>,

    /// Verification problems that did not stop the run
    pub warnings: Vec<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,
}

impl PhaseReport {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            items: Vec::new(),
            leftovers: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, step: Step, outcome: Outcome) {
        self.items.push(ItemOutcome { step, outcome });
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.items.iter().filter(|i| i.is_failure())
    }

    pub fn count(&self, outcome: &Outcome) -> usize {
        self.items
            .iter()
            .filter(|i| std::mem::discriminant(&i.outcome) == std::mem::discriminant(outcome))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none() && self.leftovers.is_empty()
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct TeardownReport {
    pub vpc_id: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub phases: Vec<PhaseReport>,
    pub duration_ms: u64,
}

impl TeardownReport {
    pub fn new(vpc_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            dry_run,
            started_at: Utc::now(),
            phases: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Whether every step completed and nothing was left behind
    pub fn is_success(&self) -> bool {
        self.phases.iter().all(PhaseReport::is_clean)
    }

    pub fn summary(&self) -> TeardownSummary {
        let total = |outcome: Outcome| self.phases.iter().map(|p| p.count(&outcome)).sum();
        TeardownSummary {
            completed: total(Outcome::Completed),
            previewed: total(Outcome::Previewed),
            already_deleted: total(Outcome::AlreadyDeleted),
            failed: total(Outcome::Failed {
                error: String::new(),
            }),
            leftovers: self.phases.iter().map(|p| p.leftovers.len()).sum(),
        }
    }
}

/// Counts over a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownSummary {
    pub completed: usize,
    pub previewed: usize,
    pub already_deleted: usize,
    pub failed: usize,
    pub leftovers: usize,
}

impl std::fmt::Display for TeardownSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.previewed > 0 {
            return write!(f, "{} previewed, nothing changed", self.previewed);
        }
        write!(
            f,
            "{} completed, {} failed, {} already deleted, {} left behind",
            self.completed, self.failed, self.already_deleted, self.leftovers
        )
    }
}
