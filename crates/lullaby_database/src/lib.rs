//! SQLite story history for Lullaby.
//!
//! This crate provides the `stories` schema, embedded migrations, plain
//! synchronous query functions over a [`SqliteConnection`](diesel::SqliteConnection),
//! and [`SqliteStoryRepository`], the async
//! [`StoryRepository`](lullaby_interface::StoryRepository) the story pipeline saves
//! through.
//!
//! # Example
//!
//! ```no_run
//! use lullaby_database::{establish_connection, list_stories, story_statistics};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut conn = establish_connection("stories.db")?;
//! for story in list_stories(&mut conn, 10, 0)? {
//!     println!("#{} {} ({:.1}/10)", story.id, story.category, story.judge_score);
//! }
//! let stats = story_statistics(&mut conn)?;
//! println!("{} stories", stats.total_stories);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod connection;
mod export;
mod models;
mod repository;
mod story_management;

/// Diesel table definitions.
pub mod schema;

pub use connection::{MIGRATIONS, establish_connection};
pub use export::{default_export_filename, export_stories_json};
pub use models::{NewStoryRow, StoryRow, story_hash};
pub use repository::SqliteStoryRepository;
pub use story_management::{
    delete_story, filter_stories, get_story, insert_story, list_stories, search_stories,
    story_statistics,
};

use lullaby_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
