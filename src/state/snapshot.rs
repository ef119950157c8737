//! Local copy of the remote todo collection.

use std::collections::BTreeMap;

use crate::net::types::{Todo, TodoId};

/// Todo records keyed by id. Iteration is in ascending id order, which has
/// no display meaning; use [`super::views::display_order`] for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    todos: BTreeMap<TodoId, Todo>,
}

impl Snapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.todos.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.todos.values()
    }

    pub(crate) fn get_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.get_mut(&id)
    }

    pub(crate) fn insert(&mut self, todo: Todo) -> Option<Todo> {
        self.todos.insert(todo.id, todo)
    }

    pub(crate) fn remove(&mut self, id: TodoId) -> Option<Todo> {
        self.todos.remove(&id)
    }
}

/// Later records win when the input repeats an id.
impl FromIterator<Todo> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        Self { todos: iter.into_iter().map(|todo| (todo.id, todo)).collect() }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Todo;
    type IntoIter = std::collections::btree_map::Values<'a, TodoId, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.todos.values()
    }
}
