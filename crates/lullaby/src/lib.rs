//! Lullaby - bedtime stories for children aged 5 to 10.
//!
//! Lullaby turns a short request ("a story about a brave little turtle")
//! into an age-appropriate bedtime story. A chat model categorizes the
//! request, writes the story, checks it against content guardrails, and
//! judges it; stories that fall short of the quality threshold are revised
//! a bounded number of times. Finished stories can be saved to SQLite and
//! browsed from the command line or a terminal dashboard.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lullaby::{LullabyConfig, OpenAIClient, ParentSettings, StoryOrchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LullabyConfig::load()?;
//!     let client = Arc::new(OpenAIClient::from_config(&config)?);
//!     let orchestrator = StoryOrchestrator::new(client, &config, ParentSettings::default())?;
//!
//!     let outcome = orchestrator
//!         .generate_story_with_judge("A sleepy owl who learns to share")
//!         .await?;
//!     println!("{}", outcome.story);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - SQLite story history (default)
//! - `tui` - Terminal dashboard over the history (default)
//! - `api` - Enables tests that call the real chat API
//!
//! # Architecture
//!
//! - `lullaby_error` - Error types
//! - `lullaby_core` - Data types and tracing setup
//! - `lullaby_interface` - `LullabyDriver` and `StoryRepository` traits
//! - `lullaby_rate_limit` - Retry policies and request limiting
//! - `lullaby_config` - Layered TOML/env configuration
//! - `lullaby_models` - OpenAI-compatible chat client
//! - `lullaby_narrative` - Categorizer, storyteller, guardrails, judge, orchestrator
//! - `lullaby_database` - SQLite persistence
//! - `lullaby_tui` - Terminal dashboard
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use lullaby_config::*;
pub use lullaby_core::*;
pub use lullaby_error::*;
pub use lullaby_interface::*;
pub use lullaby_models::*;
pub use lullaby_narrative::*;
pub use lullaby_rate_limit::*;

#[cfg(feature = "database")]
pub use lullaby_database::*;

#[cfg(feature = "tui")]
pub use lullaby_tui::{
    App, AppMode, DatabaseBackend, Event, EventHandler, StoryQuery, TuiBackend, run_tui,
};
