//! Todo-list client core: a REST client for the todo backend, a sync store
//! that keeps a local copy consistent with optimistic updates and rollback,
//! derived views for rendering, and the persisted theme preference.
//!
//! ```rust,ignore
//! use todo_sync::config::{ApiConfig, Environment, Timeouts};
//! use todo_sync::net::api::HttpTodoApi;
//! use todo_sync::state::TodoStore;
//!
//! let config = ApiConfig::resolve(Environment::Production, None, Timeouts::default())?;
//! let api = HttpTodoApi::new(&config)?;
//! let store = TodoStore::new(api);
//! store.load().await?;
//! for todo in store.ordered_list() {
//!     println!("{} {}", todo.id, todo.text);
//! }
//! ```

pub mod config;
pub mod net;
pub mod state;
pub mod util;
