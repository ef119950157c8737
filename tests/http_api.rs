//! `HttpTodoApi` and `TodoStore` against an in-process fake backend that
//! mimics the FastAPI todo service: same routes, same status codes, same
//! `{"detail": ...}` error bodies.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use todo_sync::config::{ApiConfig, Timeouts};
use todo_sync::net::api::{ApiError, HttpTodoApi, TodoApi};
use todo_sync::net::types::{CreateTodo, Todo, TodoId, TodoText, UpdateTodo};
use todo_sync::state::{StoreError, SyncError, TodoStats, TodoStore};

// =============================================================================
// FAKE BACKEND
// =============================================================================

#[derive(Default)]
struct Backend {
    todos: Vec<Todo>,
    next_id: i64,
    /// When set, every route answers with this status.
    outage: Option<StatusCode>,
}

type Shared = Arc<Mutex<Backend>>;
type Reply<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

fn check_outage(backend: &Backend) -> Result<(), (StatusCode, Json<Value>)> {
    match backend.outage {
        Some(status) => Err(detail(status, "simulated outage")),
        None => Ok(()),
    }
}

async fn list_todos(State(shared): State<Shared>) -> Reply<Vec<Todo>> {
    let backend = shared.lock().unwrap();
    check_outage(&backend)?;
    Ok(Json(backend.todos.clone()))
}

async fn create_todo(State(shared): State<Shared>, Json(body): Json<CreateTodo>) -> Reply<Todo> {
    let mut backend = shared.lock().unwrap();
    check_outage(&backend)?;
    let text = body.text.trim();
    if text.is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "Todo text cannot be empty"));
    }
    backend.next_id += 1;
    let todo = Todo { id: TodoId(backend.next_id), text: text.to_owned(), completed: false };
    backend.todos.push(todo.clone());
    Ok(Json(todo))
}

async fn update_todo(
    State(shared): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTodo>,
) -> Reply<Todo> {
    let mut backend = shared.lock().unwrap();
    check_outage(&backend)?;
    let todo = backend
        .todos
        .iter_mut()
        .find(|t| t.id == TodoId(id))
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Todo not found"))?;
    if let Some(text) = body.text {
        todo.text = text;
    }
    if let Some(completed) = body.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(shared): State<Shared>, Path(id): Path<i64>) -> Reply<Value> {
    let mut backend = shared.lock().unwrap();
    check_outage(&backend)?;
    let before = backend.todos.len();
    backend.todos.retain(|t| t.id != TodoId(id));
    if backend.todos.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Todo not found"));
    }
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}

async fn health() -> Json<Value> {
    Json(json!({
        "message": "Todo API is running",
        "status": "healthy",
        "database": "connected",
        "version": "1.0.0"
    }))
}

/// Serve the fake backend on an ephemeral port.
async fn spawn_backend(seed: Vec<Todo>) -> (HttpTodoApi, Shared) {
    let next_id = seed.iter().map(|t| t.id.0).max().unwrap_or(0);
    let shared: Shared = Arc::new(Mutex::new(Backend { todos: seed, next_id, outage: None }));

    let app = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", axum::routing::put(update_todo).delete(delete_todo))
        .route("/health", get(health))
        .with_state(Arc::clone(&shared));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig { base_url: format!("http://{addr}"), timeouts: Timeouts::default() };
    (HttpTodoApi::new(&config).unwrap(), shared)
}

fn todo(id: i64, text: &str, completed: bool) -> Todo {
    Todo { id: TodoId(id), text: text.into(), completed }
}

fn remote(shared: &Shared) -> Vec<Todo> {
    shared.lock().unwrap().todos.clone()
}

// =============================================================================
// HttpTodoApi
// =============================================================================

#[tokio::test]
async fn list_returns_backend_records() {
    let (api, _shared) = spawn_backend(vec![todo(1, "a", false), todo(2, "b", true)]).await;
    assert_eq!(api.list().await.unwrap(), vec![todo(1, "a", false), todo(2, "b", true)]);
}

#[tokio::test]
async fn create_returns_server_assigned_id() {
    let (api, shared) = spawn_backend(vec![todo(4, "seed", false)]).await;
    let created = api.create(&TodoText::parse("fresh").unwrap()).await.unwrap();
    assert_eq!(created, todo(5, "fresh", false));
    assert_eq!(remote(&shared).len(), 2);
}

#[tokio::test]
async fn update_and_delete_reach_the_backend() {
    let (api, shared) = spawn_backend(vec![todo(1, "a", false)]).await;

    api.update(TodoId(1), &UpdateTodo::completed(true)).await.unwrap();
    assert!(remote(&shared)[0].completed);

    api.delete(TodoId(1)).await.unwrap();
    assert!(remote(&shared).is_empty());
}

#[tokio::test]
async fn non_success_status_carries_code_reason_and_detail() {
    let (api, _shared) = spawn_backend(vec![]).await;
    let err = api.delete(TodoId(9)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status { status: 404, status_text: "Not Found".into(), detail: Some("Todo not found".into()) }
    );
    assert_eq!(err.to_string(), "HTTP 404: Not Found (Todo not found)");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ApiConfig { base_url: format!("http://{addr}"), timeouts: Timeouts::default() };
    let api = HttpTodoApi::new(&config).unwrap();
    assert!(matches!(api.list().await, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn health_decodes_status_document() {
    let (api, _shared) = spawn_backend(vec![]).await;
    let health = api.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.database, "connected");
}

// =============================================================================
// TodoStore over HTTP
// =============================================================================

#[tokio::test]
async fn store_round_trip_against_backend() {
    let (api, shared) = spawn_backend(vec![todo(1, "a", false), todo(2, "b", true)]).await;
    let store = TodoStore::new(api);

    assert_eq!(store.load().await.unwrap(), 2);
    assert_eq!(store.stats(), TodoStats { total: 2, completed: 1, remaining: 1 });

    let added = store.add("  c  ").await.unwrap();
    assert_eq!(added.text, "c");
    store.toggle(TodoId(1)).await.unwrap();
    store.delete(TodoId(2)).await.unwrap();

    assert_eq!(store.ordered_list(), vec![added.clone(), todo(1, "a", true)]);
    let mut server = remote(&shared);
    server.sort_by_key(|t| t.id);
    assert_eq!(server, vec![todo(1, "a", true), added]);
}

#[tokio::test]
async fn store_load_during_outage_keeps_snapshot() {
    let (api, shared) = spawn_backend(vec![todo(1, "a", false), todo(2, "b", true)]).await;
    let store = TodoStore::new(api);
    store.load().await.unwrap();

    shared.lock().unwrap().outage = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let err = store.load().await.unwrap_err();

    assert!(matches!(err, SyncError::Connectivity { .. }));
    assert_eq!(store.snapshot().len(), 2);
    let message = store.error_message().unwrap();
    assert!(message.contains("Connection failed"));
    assert!(message.contains("500"));

    shared.lock().unwrap().outage = None;
    store.retry().await.unwrap();
    assert!(store.error().is_none());
}

#[tokio::test]
async fn store_rolls_back_toggle_and_delete_during_outage() {
    let (api, shared) = spawn_backend(vec![todo(1, "a", false), todo(2, "b", true)]).await;
    let store = TodoStore::new(api);
    store.load().await.unwrap();
    let before = store.snapshot();

    shared.lock().unwrap().outage = Some(StatusCode::SERVICE_UNAVAILABLE);

    assert!(store.toggle(TodoId(1)).await.is_err());
    assert_eq!(store.snapshot(), before);
    assert!(store.error_message().unwrap().contains("Failed to update todo"));

    assert!(store.delete(TodoId(2)).await.is_err());
    assert_eq!(store.snapshot(), before);
    assert!(store.error_message().unwrap().contains("Failed to delete todo"));

    let err = store.add("x").await.unwrap_err();
    assert!(matches!(err, StoreError::Sync(_)));
    assert_eq!(store.snapshot(), before);
}
