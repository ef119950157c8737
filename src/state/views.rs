//! Derived views over a snapshot: counters and display ordering.
//!
//! Both are pure and recomputed from scratch on every render; nothing here
//! is cached or stored.

#[cfg(test)]
#[path = "views_test.rs"]
mod views_test;

use std::cmp::Reverse;

use super::snapshot::Snapshot;
use crate::net::types::Todo;

/// Aggregate counters for the stats summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

#[must_use]
pub fn compute_stats(snapshot: &Snapshot) -> TodoStats {
    let total = snapshot.len();
    let completed = snapshot.iter().filter(|todo| todo.completed).count();
    TodoStats { total, completed, remaining: total - completed }
}

/// Incomplete todos first, then completed; newest (highest id) first within
/// each group.
#[must_use]
pub fn display_order(snapshot: &Snapshot) -> Vec<Todo> {
    let mut ordered: Vec<Todo> = snapshot.iter().cloned().collect();
    ordered.sort_by_key(|todo| (todo.completed, Reverse(todo.id)));
    ordered
}
