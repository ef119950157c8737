mod render;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug};

use todo_sync::config::{
    self, ApiConfig, ConfigError, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, Environment, Timeouts,
};
use todo_sync::net::api::{ApiError, HttpTodoApi, TodoApi};
use todo_sync::net::types::{Todo, TodoId};
use todo_sync::state::{StoreError, SyncError, TodoStore};
use todo_sync::util::prefs::PrefsError;
use todo_sync::util::theme::{self, PreferencesFile};

use crate::render::{Palette, render_state, stats_line};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("todo #{0} not found")]
    NotFound(TodoId),
}

#[derive(Parser, Debug)]
#[command(name = "todo-sync", about = "Terminal client for the todo REST API")]
struct Cli {
    /// Backend base URL; overrides the environment default.
    #[arg(long, env = "TODO_API_URL")]
    base_url: Option<String>,

    #[arg(long = "env", env = "TODO_ENV", default_value = "development")]
    environment: Environment,

    #[arg(long, env = "TODO_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "TODO_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, env = "TODO_PREFS_PATH")]
    prefs: Option<PathBuf>,

    #[arg(short, long, help = "Log requests to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show todos: open items first, newest first.
    List,
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Toggle {
        id: TodoId,
    },
    Edit {
        id: TodoId,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Delete {
        id: TodoId,
    },
    Stats,
    /// Check backend health.
    Ping,
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Interactive session reading commands from stdin.
    Session,
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    Toggle,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let timeouts = Timeouts { request_secs: cli.request_timeout_secs, connect_secs: cli.connect_timeout_secs };
    let config = ApiConfig::resolve(cli.environment, cli.base_url.as_deref(), timeouts)?;
    let prefs_file = PreferencesFile::new(cli.prefs.unwrap_or_else(config::default_prefs_path));
    let mut prefs = prefs_file.load();
    debug!(base_url = %config.base_url, prefs = %prefs_file.path().display(), "todo client starting");

    let store = TodoStore::new(HttpTodoApi::new(&config)?);
    let palette = Palette::from_env(prefs.theme);

    match cli.command {
        Command::List => {
            store.load().await?;
        }
        Command::Add { text } => {
            store.load().await?;
            store.add(&text.join(" ")).await?;
        }
        Command::Toggle { id } => {
            store.load().await?;
            require(id, store.toggle(id).await?)?;
        }
        Command::Edit { id, text } => {
            store.load().await?;
            require(id, store.edit(id, &text.join(" ")).await?)?;
        }
        Command::Delete { id } => {
            store.load().await?;
            require(id, store.delete(id).await?)?;
        }
        Command::Stats => {
            store.load().await?;
            println!("{}", stats_line(store.stats()));
            return Ok(());
        }
        Command::Ping => {
            let health = store.api().health().await?;
            println!("ok: {} (database {}, version {})", health.status, health.database, health.version);
            return Ok(());
        }
        Command::Theme { action: None } => {
            println!("{}", prefs.theme);
            return Ok(());
        }
        Command::Theme { action: Some(ThemeAction::Toggle) } => {
            println!("{}", theme::toggle_theme(&mut prefs, &prefs_file)?);
            return Ok(());
        }
        Command::Session => {
            session::run(&store, &mut prefs, &prefs_file).await?;
            return Ok(());
        }
    }

    print!("{}", render_state(&store.state(), palette));
    Ok(())
}

fn require(id: TodoId, todo: Option<Todo>) -> Result<Todo, CliError> {
    todo.ok_or(CliError::NotFound(id))
}
