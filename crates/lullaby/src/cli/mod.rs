//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the lullaby binary.

mod commands;
mod generate;
mod settings;
mod stories;
mod tui_handler;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
pub use settings::{database_path, load_config};
pub use stories::handle_stories_command;
pub use tui_handler::launch_tui;
