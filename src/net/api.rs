//! REST client for the todo backend.
//!
//! `TodoApi` is the seam the sync store talks through; `HttpTodoApi` is the
//! `reqwest` implementation used by the binary. Tests substitute an
//! in-memory implementation.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Any non-2xx status is a failure
//! carrying the numeric status and its reason phrase; the backend's
//! `{"detail": ...}` body is attached when present. Response bodies of
//! update/delete are never read on success.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{CreateTodo, ErrorBody, Health, Todo, TodoId, TodoText, UpdateTodo};
use crate::config::ApiConfig;

const TODOS_ENDPOINT: &str = "/todos";
const HEALTH_ENDPOINT: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (connect refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{}", status_message(.status, .status_text, .detail))]
    Status { status: u16, status_text: String, detail: Option<String> },

    /// The response body did not match the expected schema.
    #[error("response parse failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a status error from a bare code, filling in the reason phrase.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_owned();
        Self::Status { status, status_text, detail: None }
    }

    /// HTTP status code, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_message(status: &u16, status_text: &str, detail: &Option<String>) -> String {
    let mut message = if status_text.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {status_text}")
    };
    if let Some(detail) = detail.as_deref().filter(|d| !d.is_empty()) {
        message.push_str(" (");
        message.push_str(detail);
        message.push(')');
    }
    message
}

fn todo_endpoint(id: TodoId) -> String {
    format!("{TODOS_ENDPOINT}/{id}")
}

fn parse_error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Operations the sync store issues against the remote collection.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// `GET /todos`.
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    /// `POST /todos`; returns the record with its server-assigned id.
    async fn create(&self, text: &TodoText) -> Result<Todo, ApiError>;

    /// `PUT /todos/{id}` with a partial update.
    async fn update(&self, id: TodoId, update: &UpdateTodo) -> Result<(), ApiError>;

    /// `DELETE /todos/{id}`.
    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;

    /// `GET /health`.
    async fn health(&self) -> Result<Health, ApiError>;
}

#[async_trait]
impl<T: TodoApi + ?Sized> TodoApi for Arc<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, text: &TodoText) -> Result<Todo, ApiError> {
        (**self).create(text).await
    }

    async fn update(&self, id: TodoId, update: &UpdateTodo) -> Result<(), ApiError> {
        (**self).update(id, update).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }

    async fn health(&self) -> Result<Health, ApiError> {
        (**self).health().await
    }
}

/// `reqwest`-backed [`TodoApi`].
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Build a client for `config.base_url`. A request timeout of zero
    /// disables the per-request deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot initialize.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        if config.timeouts.request_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeouts.request_secs));
        }
        let http = builder.build().map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            detail: parse_error_detail(&body),
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        debug!(path = TODOS_ENDPOINT, "GET");
        let response = self.send(self.http.get(self.url(TODOS_ENDPOINT))).await?;
        Self::decode(response).await
    }

    async fn create(&self, text: &TodoText) -> Result<Todo, ApiError> {
        debug!(path = TODOS_ENDPOINT, "POST");
        let body = CreateTodo { text: text.as_str().to_owned() };
        let response = self.send(self.http.post(self.url(TODOS_ENDPOINT)).json(&body)).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: TodoId, update: &UpdateTodo) -> Result<(), ApiError> {
        let path = todo_endpoint(id);
        debug!(%path, "PUT");
        self.send(self.http.put(self.url(&path)).json(update)).await?;
        Ok(())
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let path = todo_endpoint(id);
        debug!(%path, "DELETE");
        self.send(self.http.delete(self.url(&path))).await?;
        Ok(())
    }

    async fn health(&self) -> Result<Health, ApiError> {
        debug!(path = HEALTH_ENDPOINT, "GET");
        let response = self.send(self.http.get(self.url(HEALTH_ENDPOINT))).await?;
        Self::decode(response).await
    }
}
