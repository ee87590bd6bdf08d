//! Teardown error types

use crate::phase::Phase;
use strato_cloud::{CloudError, WaitError};
use thiserror::Error;

/// Errors that stop a teardown run
#[derive(Error, Debug)]
pub enum TeardownError {
    #[error("{phase}: failed to get {what}: {source}")]
    Listing {
        phase: Phase,
        what: String,
        #[source]
        source: CloudError,
    },

    #[error("failed to delete VPC {vpc_id}: {source}")]
    ContainerDeletion {
        vpc_id: String,
        #[source]
        source: ItemError,
    },

    #[error("confirmation did not match VPC id {vpc_id}; nothing was deleted")]
    ConfirmationDeclined { vpc_id: String },

    #[error("confirmation prompt failed: {0}")]
    ConfirmationInput(#[source] std::io::Error),
}

/// Failure of a single step; recorded in the phase report, never fatal
/// except for the VPC itself
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("delete request failed: {0}")]
    Delete(#[source] CloudError),

    #[error("update request failed: {0}")]
    Patch(#[source] CloudError),

    #[error("lookup failed: {0}")]
    Lookup(#[source] CloudError),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

pub type Result<T> = std::result::Result<T, TeardownError>;
