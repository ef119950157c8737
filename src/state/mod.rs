//! Client-side todo state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `todos` owns the synchronized collection and its mutations, `views`
//! derives what the renderer shows, and `error` models the single error
//! banner. `record_locks` keeps mutations on one record from overlapping.

pub mod error;
mod record_locks;
pub mod snapshot;
pub mod todos;
pub mod views;

pub use error::{MutationAction, StoreError, SyncError};
pub use snapshot::Snapshot;
pub use todos::{StoreState, TodoStore};
pub use views::{TodoStats, compute_stats, display_order};
