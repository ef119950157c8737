//! Todo sync store: the local copy of the remote collection and every
//! mutation against it.
//!
//! DESIGN
//! ======
//! The whole store state lives in one `watch` channel. Each change is a
//! single `send_modify` closure, so subscribers (the renderer) never see a
//! half-applied mutation and are woken exactly once per change.
//!
//! Toggle, edit and delete are optimistic: the snapshot changes before the
//! request is sent and is rolled back if the request fails. Add is not
//! optimistic because the id is assigned by the server.
//!
//! CONCURRENCY
//! ===========
//! Mutations on the same id are serialized by `RecordLocks`; the lock is
//! held until the call and any rollback have finished. Rollbacks are
//! skipped when a `load()` has replaced the snapshot in the meantime, since
//! the loaded data is newer than the pre-mutation value.
//!
//! The opposite race also exists: a `load()` issued before a mutation may
//! answer with a body the server produced before that mutation committed.
//! While any load is in flight, committed mutations are journaled, and a
//! landing load replays every entry newer than its own start onto the
//! response before publishing it. The journal is empty whenever no load is
//! in flight.

#[cfg(test)]
#[path = "todos_test.rs"]
mod todos_test;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error::{MutationAction, StoreError, SyncError};
use super::record_locks::RecordLocks;
use super::snapshot::Snapshot;
use super::views::{TodoStats, compute_stats, display_order};
use crate::net::api::TodoApi;
use crate::net::types::{Todo, TodoId, TodoText, UpdateTodo};

/// Everything a renderer needs, published as one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Current todo collection.
    pub todos: Snapshot,
    /// Active error banner, if any.
    pub error: Option<SyncError>,
    /// Loads currently in flight.
    loads_in_flight: usize,
    /// Bumped by every successful load.
    generation: u64,
    /// Bumped by every committed mutation.
    commits: u64,
    /// Mutations committed while a load was in flight, tagged with their
    /// `commits` value.
    journal: Vec<(u64, Committed)>,
}

/// A mutation the server has acknowledged.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Committed {
    Insert(Todo),
    Completed(TodoId, bool),
    Text(TodoId, String),
    Remove(TodoId),
}

impl Committed {
    /// Apply to `todos`; returns whether anything changed.
    fn replay(&self, todos: &mut Snapshot) -> bool {
        match self {
            Self::Insert(todo) => {
                if todos.get(todo.id) == Some(todo) {
                    return false;
                }
                todos.insert(todo.clone());
                true
            }
            Self::Completed(id, completed) => match todos.get_mut(*id) {
                Some(todo) if todo.completed != *completed => {
                    todo.completed = *completed;
                    true
                }
                _ => false,
            },
            Self::Text(id, text) => match todos.get_mut(*id) {
                Some(todo) if todo.text != *text => {
                    todo.text.clone_from(text);
                    true
                }
                _ => false,
            },
            Self::Remove(id) => todos.remove(*id).is_some(),
        }
    }
}

impl StoreState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    #[must_use]
    pub fn stats(&self) -> TodoStats {
        compute_stats(&self.todos)
    }

    #[must_use]
    pub fn ordered_list(&self) -> Vec<Todo> {
        display_order(&self.todos)
    }

    fn end_load(&mut self) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        if self.loads_in_flight == 0 {
            self.journal.clear();
        }
    }
}

/// One in-flight `load()`. Dropping it unfinished (the caller's future was
/// cancelled) still ends the load.
struct LoadTicket<'a> {
    state: &'a watch::Sender<StoreState>,
    since: u64,
    open: bool,
}

impl<'a> LoadTicket<'a> {
    fn start(state: &'a watch::Sender<StoreState>) -> Self {
        let mut since = 0;
        state.send_modify(|state| {
            state.loads_in_flight += 1;
            since = state.commits;
        });
        Self { state, since, open: true }
    }

    /// End the load, running `finish` in the same state change.
    fn close(mut self, finish: impl FnOnce(&mut StoreState, u64)) {
        self.open = false;
        let since = self.since;
        self.state.send_modify(|state| {
            finish(state, since);
            state.end_load();
        });
    }
}

impl Drop for LoadTicket<'_> {
    fn drop(&mut self) {
        if self.open {
            self.state.send_modify(StoreState::end_load);
        }
    }
}

pub struct TodoStore<A> {
    api: A,
    state: watch::Sender<StoreState>,
    locks: RecordLocks,
}

impl<A: TodoApi> TodoStore<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { api, state, locks: RecordLocks::default() }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().todos.clone()
    }

    #[must_use]
    pub fn stats(&self) -> TodoStats {
        self.state.borrow().stats()
    }

    #[must_use]
    pub fn ordered_list(&self) -> Vec<Todo> {
        self.state.borrow().ordered_list()
    }

    #[must_use]
    pub fn error(&self) -> Option<SyncError> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.state.borrow().error.as_ref().map(ToString::to_string)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Replace the snapshot with the server's collection.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connectivity`] (also stored in the error slot)
    /// when the list call fails; the previous snapshot is kept.
    pub async fn load(&self) -> Result<usize, SyncError> {
        let ticket = LoadTicket::start(&self.state);

        match self.api.list().await {
            Ok(todos) => {
                let mut todos: Snapshot = todos.into_iter().collect();
                let mut count = 0;
                let mut replayed = 0;
                ticket.close(|state, since| {
                    for (_, change) in state.journal.iter().filter(|(seq, _)| *seq > since) {
                        change.replay(&mut todos);
                        replayed += 1;
                    }
                    count = todos.len();
                    state.generation += 1;
                    state.todos = todos;
                    if state.error.as_ref().is_some_and(SyncError::is_retryable) {
                        state.error = None;
                    }
                });
                info!(count, replayed, "todos loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "failed to load todos");
                let error = SyncError::connectivity(&err);
                let slot = error.clone();
                ticket.close(|state, _| state.error = Some(slot));
                Err(error)
            }
        }
    }

    /// Re-run [`TodoStore::load`] after a connectivity failure.
    ///
    /// # Errors
    ///
    /// Same as [`TodoStore::load`].
    pub async fn retry(&self) -> Result<usize, SyncError> {
        self.load().await
    }

    /// Create a todo. Nothing is inserted until the server returns the
    /// record with its id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] for blank or over-long text (no request is
    /// sent, the error slot is untouched); [`StoreError::Sync`] when the
    /// create call fails.
    pub async fn add(&self, text: &str) -> Result<Todo, StoreError> {
        let text = TodoText::parse(text)?;

        match self.api.create(&text).await {
            Ok(todo) => {
                info!(id = %todo.id, "todo added");
                self.commit(Committed::Insert(todo.clone()));
                Ok(todo)
            }
            Err(err) => {
                warn!(error = %err, "failed to add todo");
                let error = SyncError::mutation(MutationAction::Add, &err);
                self.fail(error.clone(), |_| {});
                Err(error.into())
            }
        }
    }

    /// Flip `completed` locally, then persist it. Returns the optimistic
    /// record, or `None` when `id` is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Mutation`] after reverting the flip when the
    /// update call fails.
    pub async fn toggle(&self, id: TodoId) -> Result<Option<Todo>, SyncError> {
        let _guard = self.locks.acquire(id).await;

        let Some((toggled, generation)) = self.apply(id, |todo| todo.completed = !todo.completed) else {
            debug!(%id, "toggle ignored; todo not in snapshot");
            return Ok(None);
        };

        match self.api.update(id, &UpdateTodo::completed(toggled.completed)).await {
            Ok(()) => {
                self.commit(Committed::Completed(id, toggled.completed));
                Ok(Some(toggled))
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to toggle todo; reverting");
                let error = SyncError::mutation(MutationAction::Update, &err);
                self.fail(error.clone(), |state| {
                    if state.generation != generation {
                        return;
                    }
                    if let Some(todo) = state.todos.get_mut(id) {
                        todo.completed = !toggled.completed;
                    }
                });
                Err(error)
            }
        }
    }

    /// Replace a todo's text locally, then persist it. Returns the
    /// optimistic record, or `None` when `id` is unknown.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] for blank or over-long text;
    /// [`StoreError::Sync`] after restoring the old text when the update
    /// call fails.
    pub async fn edit(&self, id: TodoId, text: &str) -> Result<Option<Todo>, StoreError> {
        let text = TodoText::parse(text)?;
        let _guard = self.locks.acquire(id).await;

        let mut previous = String::new();
        let Some((edited, generation)) =
            self.apply(id, |todo| previous = std::mem::replace(&mut todo.text, text.as_str().to_owned()))
        else {
            debug!(%id, "edit ignored; todo not in snapshot");
            return Ok(None);
        };

        match self.api.update(id, &UpdateTodo::text(&text)).await {
            Ok(()) => {
                self.commit(Committed::Text(id, edited.text.clone()));
                Ok(Some(edited))
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to edit todo; reverting");
                let error = SyncError::mutation(MutationAction::Update, &err);
                self.fail(error.clone(), |state| {
                    if state.generation != generation {
                        return;
                    }
                    if let Some(todo) = state.todos.get_mut(id) {
                        todo.text = previous;
                    }
                });
                Err(error.into())
            }
        }
    }

    /// Remove a todo locally, then delete it remotely. Returns the removed
    /// record, or `None` when `id` is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Mutation`] after re-inserting the exact removed
    /// record when the delete call fails.
    pub async fn delete(&self, id: TodoId) -> Result<Option<Todo>, SyncError> {
        let _guard = self.locks.acquire(id).await;

        let mut removed = None;
        let mut generation = 0;
        self.state.send_if_modified(|state| {
            removed = state.todos.remove(id);
            generation = state.generation;
            removed.is_some()
        });
        let Some(removed) = removed else {
            debug!(%id, "delete ignored; todo not in snapshot");
            return Ok(None);
        };

        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "todo deleted");
                self.commit(Committed::Remove(id));
                Ok(Some(removed))
            }
            Err(err) => {
                warn!(%id, error = %err, "failed to delete todo; restoring");
                let error = SyncError::mutation(MutationAction::Delete, &err);
                let restored = removed.clone();
                self.fail(error.clone(), |state| {
                    if state.generation == generation && !state.todos.contains(id) {
                        state.todos.insert(restored);
                    }
                });
                Err(error)
            }
        }
    }

    /// Mutate one record in place. Returns the updated record and the
    /// snapshot generation it was applied against.
    fn apply(&self, id: TodoId, mutate: impl FnOnce(&mut Todo)) -> Option<(Todo, u64)> {
        let mut applied = None;
        self.state.send_if_modified(|state| {
            let generation = state.generation;
            let Some(todo) = state.todos.get_mut(id) else {
                return false;
            };
            mutate(todo);
            applied = Some((todo.clone(), generation));
            true
        });
        applied
    }

    /// Record a server-acknowledged mutation. It is re-applied to the
    /// current snapshot, since a load may have landed while it was in flight,
    /// and journaled for any load still outstanding.
    fn commit(&self, change: Committed) {
        self.state.send_if_modified(|state| {
            state.commits += 1;
            let changed = change.replay(&mut state.todos);
            if state.loads_in_flight > 0 {
                state.journal.push((state.commits, change));
            }
            changed
        });
    }

    /// Roll back and publish the error in one state change.
    fn fail(&self, error: SyncError, rollback: impl FnOnce(&mut StoreState)) {
        self.state.send_modify(|state| {
            rollback(state);
            state.error = Some(error);
        });
    }
}
