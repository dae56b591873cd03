//! Terminal dashboard for story history.
//!
//! Browse saved bedtime stories, read them in full, search, filter by
//! category, check aggregate statistics, delete, and export. Built with
//! ratatui for rendering and crossterm for terminal input.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod backend;
#[cfg(feature = "database")]
mod database_backend;
mod events;
mod runner;
mod ui;

pub use app::{App, AppMode, StoryQuery};
pub use backend::TuiBackend;
#[cfg(feature = "database")]
pub use database_backend::DatabaseBackend;
pub use events::{Event, EventHandler};
pub use lullaby_error::{TuiError, TuiErrorKind, TuiResult};
pub use runner::{LIST_LIMIT, handle_event, reload, run_tui};
