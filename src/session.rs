//! Interactive session: one store kept alive across typed intents.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use todo_sync::net::api::TodoApi;
use todo_sync::net::types::TodoId;
use todo_sync::state::{StoreError, TodoStore};
use todo_sync::util::theme::{self, Preferences, PreferencesFile};

use crate::render::{Palette, render_state};

pub(crate) const HELP: &str = "\
commands:
  add <text>        create a todo
  toggle <id>       flip completed
  edit <id> <text>  change text
  rm <id>           delete a todo
  list              redraw
  retry             reload after a connection failure
  dismiss           hide the error banner
  theme             switch light/dark
  quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    Add(String),
    Toggle(TodoId),
    Edit(TodoId, String),
    Delete(TodoId),
    List,
    Retry,
    Dismiss,
    Theme,
    Help,
    Quit,
}

pub(crate) fn parse_intent(line: &str) -> Result<Intent, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let id = |raw: &str| raw.parse::<TodoId>().map_err(|_| format!("expected a todo id, got '{raw}'"));

    match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => Ok(Intent::Add(rest.to_owned())),
        "toggle" | "t" | "done" => id(rest).map(Intent::Toggle),
        "edit" | "e" => {
            let (raw_id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(Intent::Edit(id(raw_id)?, text.trim().to_owned()))
        }
        "rm" | "delete" | "del" => id(rest).map(Intent::Delete),
        "" | "list" | "ls" => Ok(Intent::List),
        "retry" | "r" => Ok(Intent::Retry),
        "dismiss" | "clear" => Ok(Intent::Dismiss),
        "theme" => Ok(Intent::Theme),
        "help" | "?" => Ok(Intent::Help),
        "quit" | "exit" | "q" => Ok(Intent::Quit),
        other => Err(format!("unknown command '{other}' (try `help`)")),
    }
}

/// Apply one intent. Remote failures land in the store's error slot and are
/// shown by the next redraw; the returned string is an extra notice.
pub(crate) async fn apply_intent<A: TodoApi>(
    store: &TodoStore<A>,
    prefs: &mut Preferences,
    prefs_file: &PreferencesFile,
    intent: Intent,
) -> Option<String> {
    debug!(?intent, "session intent");
    match intent {
        Intent::Add(text) => match store.add(&text).await {
            Err(StoreError::Invalid(e)) => Some(e.to_string()),
            _ => None,
        },
        Intent::Toggle(id) => match store.toggle(id).await {
            Ok(None) => Some(format!("no todo #{id}")),
            _ => None,
        },
        Intent::Edit(id, text) => match store.edit(id, &text).await {
            Err(StoreError::Invalid(e)) => Some(e.to_string()),
            Ok(None) => Some(format!("no todo #{id}")),
            _ => None,
        },
        Intent::Delete(id) => match store.delete(id).await {
            Ok(None) => Some(format!("no todo #{id}")),
            _ => None,
        },
        Intent::Retry => {
            let _ = store.retry().await;
            None
        }
        Intent::Dismiss => {
            store.clear_error();
            None
        }
        Intent::Theme => match theme::toggle_theme(prefs, prefs_file) {
            Ok(theme) => Some(format!("theme: {theme}")),
            Err(e) => Some(format!("theme: {} (not saved: {e})", prefs.theme)),
        },
        Intent::Help => Some(HELP.to_owned()),
        Intent::List | Intent::Quit => None,
    }
}

/// Read intents from stdin until EOF or `quit`, redrawing after each.
pub(crate) async fn run<A: TodoApi>(
    store: &TodoStore<A>,
    prefs: &mut Preferences,
    prefs_file: &PreferencesFile,
) -> std::io::Result<()> {
    let _ = store.load().await;
    print!("{}", render_state(&store.state(), Palette::from_env(prefs.theme)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let intent = match parse_intent(&line) {
            Ok(Intent::Quit) => break,
            Ok(intent) => intent,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if let Some(notice) = apply_intent(store, prefs, prefs_file, intent).await {
            println!("{notice}");
        }
        print!("{}", render_state(&store.state(), Palette::from_env(prefs.theme)));
    }
    Ok(())
}
