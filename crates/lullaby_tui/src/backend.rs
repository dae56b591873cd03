//! Data access seam for the dashboard.

use crate::StoryQuery;
use lullaby_core::{StoredStory, StoryStatistics};
use lullaby_error::TuiResult;
use std::path::PathBuf;

/// Story source behind the dashboard.
///
/// Only requires `Send`: the dashboard runs on one thread and SQLite
/// connections are not `Sync`.
pub trait TuiBackend: Send {
    /// Load at most `limit` stories matching `query`, newest first.
    fn load_stories(&mut self, query: &StoryQuery, limit: i64) -> TuiResult<Vec<StoredStory>>;

    /// Delete a story. Returns `false` if it was already gone.
    fn delete_story(&mut self, id: i32) -> TuiResult<bool>;

    /// Aggregate statistics over every stored story.
    fn statistics(&mut self) -> TuiResult<StoryStatistics>;

    /// Write `stories` to a timestamped JSON file and return its path.
    fn export_stories(&mut self, stories: &[StoredStory]) -> TuiResult<PathBuf>;
}
