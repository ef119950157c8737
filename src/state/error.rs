//! The store's single error slot.
//!
//! DESIGN
//! ======
//! Failures are values the presentation layer reads and clears, never
//! panics or errors bubbling out of a render. Only one error is active at a
//! time; a newer failure replaces an older one.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

use crate::net::api::ApiError;
use crate::net::types::TextError;

/// The mutation that failed, used to phrase the banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationAction {
    Add,
    Update,
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// A failed remote call, as surfaced to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Loading the collection failed; retryable.
    #[error("Connection failed: {detail}")]
    Connectivity { detail: String },

    /// A mutation was rejected or never reached the backend.
    #[error("Failed to {action} todo: {detail}")]
    Mutation { action: MutationAction, detail: String },
}

impl SyncError {
    #[must_use]
    pub fn connectivity(err: &ApiError) -> Self {
        Self::Connectivity { detail: err.to_string() }
    }

    #[must_use]
    pub fn mutation(action: MutationAction, err: &ApiError) -> Self {
        Self::Mutation { action, detail: err.to_string() }
    }

    /// Whether `retry()` is the suggested remedy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// Error returned by store operations that also validate input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Rejected locally; nothing was sent and the error slot is untouched.
    #[error(transparent)]
    Invalid(#[from] TextError),

    /// The remote call failed; the same error is now in the error slot.
    #[error(transparent)]
    Sync(#[from] SyncError),
}
