//! Per-record mutation serialization.
//!
//! Toggle, edit and delete all read a record, mutate it optimistically, and
//! may roll it back. Two of these racing on one id could let a late rollback
//! overwrite a newer optimistic state, so each id gets an async mutex held
//! for the whole read-call-rollback cycle. Distinct ids never contend.

#[cfg(test)]
#[path = "record_locks_test.rs"]
mod record_locks_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::net::types::TodoId;

type Slot = Arc<AsyncMutex<()>>;

#[derive(Debug, Default)]
pub(crate) struct RecordLocks {
    slots: Mutex<HashMap<TodoId, Slot>>,
}

/// Held while a mutation on `id` is in flight. Dropping it lets the next
/// queued mutation on the same id proceed.
pub(crate) struct RecordGuard<'a> {
    locks: &'a RecordLocks,
    id: TodoId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl RecordLocks {
    /// Wait until no other mutation on `id` is in flight.
    pub(crate) async fn acquire(&self, id: TodoId) -> RecordGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(id).or_default())
        };
        let guard = slot.lock_owned().await;
        RecordGuard { locks: self, id, guard: Some(guard) }
    }

    /// Number of ids with a mutation in flight or queued.
    #[cfg(test)]
    pub(crate) fn active(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Drop for RecordGuard<'_> {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        let mut slots = self.locks.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // Map entry plus this guard: nobody else holds or waits on the slot.
        let idle = slots.get(&self.id).is_some_and(|slot| Arc::strong_count(slot) == 2);
        drop(guard);
        if idle {
            slots.remove(&self.id);
        }
    }
}
