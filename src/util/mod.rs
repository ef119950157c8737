//! Utility helpers shared by the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Keeps filesystem and display-preference concerns out of the sync store.

pub mod prefs;
pub mod theme;
