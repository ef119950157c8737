//! Terminal rendering of store state.
//!
//! Everything here is a pure function of a `StoreState` snapshot and the
//! theme, recomputed on every redraw.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use todo_sync::net::types::Todo;
use todo_sync::state::{StoreState, SyncError, TodoStats};
use todo_sync::util::theme::Theme;

/// ANSI escape sequences for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    accent: &'static str,
    muted: &'static str,
    error: &'static str,
    reset: &'static str,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self { accent: "\x1b[34m", muted: "\x1b[90m", error: "\x1b[31m", reset: "\x1b[0m" },
            Theme::Dark => Self { accent: "\x1b[96m", muted: "\x1b[37m", error: "\x1b[91m", reset: "\x1b[0m" },
        }
    }

    pub(crate) fn plain() -> Self {
        Self { accent: "", muted: "", error: "", reset: "" }
    }

    /// Theme palette, unless `NO_COLOR` is set.
    pub(crate) fn from_env(theme: Theme) -> Self {
        if std::env::var_os("NO_COLOR").is_some() { Self::plain() } else { Self::for_theme(theme) }
    }
}

pub(crate) fn stats_line(stats: TodoStats) -> String {
    format!("{} total, {} completed, {} remaining", stats.total, stats.completed, stats.remaining)
}

pub(crate) fn todo_line(todo: &Todo, palette: Palette) -> String {
    if todo.completed {
        format!("  {}[x] #{} {}{}", palette.muted, todo.id, todo.text, palette.reset)
    } else {
        format!("  [ ] {}#{}{} {}", palette.accent, todo.id, palette.reset, todo.text)
    }
}

pub(crate) fn error_banner(error: &SyncError, palette: Palette) -> String {
    let hint = if error.is_retryable() { "type `retry` to try again, " } else { "" };
    format!("{}! {error}{} ({hint}`dismiss` to hide)", palette.error, palette.reset)
}

pub(crate) fn render_state(state: &StoreState, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}Todos{} ({})", palette.accent, palette.reset, stats_line(state.stats()));

    let ordered = state.ordered_list();
    if ordered.is_empty() {
        let empty = if state.is_loading() { "Loading..." } else { "No todos yet." };
        let _ = writeln!(out, "  {}{empty}{}", palette.muted, palette.reset);
    }
    for todo in &ordered {
        let _ = writeln!(out, "{}", todo_line(todo, palette));
    }

    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", error_banner(error, palette));
    }
    out
}
