//! Wire schema shared with the todo backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! These types mirror the JSON bodies of the `/todos` collection endpoint.
//! `TodoText` is the only validated type: the backend rejects blank or
//! over-long text with HTTP 400, so the client checks the same rules before
//! spending a round trip.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum todo text length accepted by the backend, in characters.
pub const MAX_TODO_TEXT_CHARS: usize = 500;

/// Server-assigned todo identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse::<i64>().map(TodoId)
    }
}

/// A todo record as stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Todo text that passed local validation: trimmed, non-empty, and within
/// [`MAX_TODO_TEXT_CHARS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoText(String);

/// Why a raw string was rejected as todo text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("todo text cannot be empty")]
    Empty,
    #[error("todo text cannot exceed {max} characters (got {len})")]
    TooLong { len: usize, max: usize },
}

impl TodoText {
    /// Trim and validate raw input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::TooLong`]
    /// when the trimmed text exceeds [`MAX_TODO_TEXT_CHARS`].
    pub fn parse(raw: &str) -> Result<Self, TextError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_TODO_TEXT_CHARS {
            return Err(TextError::TooLong { len, max: MAX_TODO_TEXT_CHARS });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body of `POST /todos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Body of `PUT /todos/{id}`. Absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self { text: None, completed: Some(completed) }
    }

    #[must_use]
    pub fn text(text: &TodoText) -> Self {
        Self { text: Some(text.as_str().to_owned()), completed: None }
    }
}

/// Response of `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub version: String,
}

/// FastAPI-style error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) detail: serde_json::Value,
}
