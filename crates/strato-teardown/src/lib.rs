//! Dependency-ordered VPC teardown
//!
//! [`Orchestrator::run`] deletes every resource living inside a VPC and then
//! the VPC itself. Phases run strictly in the order of [`Phase::ALL`]; inside
//! a phase each candidate goes through the [`DryRunGate`] and is awaited
//! before the next call is made.
//!
//! ```no_run
//! # async fn demo(services: strato_cloud::CloudServices) -> strato_teardown::Result<()> {
//! use strato_teardown::{Orchestrator, TeardownOptions};
//!
//! let orchestrator = Orchestrator::new(services, TeardownOptions::default());
//! let report = orchestrator.run("vpc-1", true).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod confirm;
pub mod error;
pub mod orchestrator;
pub mod phase;
mod phases;
pub mod progress;
pub mod report;
pub mod step;

pub use confirm::{confirm, confirm_stdin};
pub use error::{ItemError, Result, TeardownError};
pub use orchestrator::{Orchestrator, RunContext, TeardownOptions, WaitStrategy};
pub use phase::Phase;
pub use progress::{NullProgress, ProgressEvent, ProgressSink};
pub use report::{ItemOutcome, Outcome, PhaseReport, TeardownReport, TeardownSummary};
pub use step::{DryRunGate, Gated, Step, StepAction};
