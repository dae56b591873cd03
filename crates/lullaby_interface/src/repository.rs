//! Story persistence trait.

use async_trait::async_trait;
use lullaby_core::{StoredStory, StoryFilter, StoryOutcome, StoryStatistics};
use lullaby_error::LullabyResult;

/// Persistence for generated stories.
///
/// The orchestrator saves every finished story through this trait; the CLI
/// reads history back through it.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Save a finished story and return its row id.
    async fn save_story(&self, outcome: &StoryOutcome) -> LullabyResult<i32>;

    /// Load one story, `None` if the id is unknown.
    async fn get_story(&self, id: i32) -> LullabyResult<Option<StoredStory>>;

    /// Most recent stories first.
    async fn list_stories(&self, limit: i64, offset: i64) -> LullabyResult<Vec<StoredStory>>;

    /// Stories whose request or text contains `query`.
    async fn search_stories(&self, query: &str, limit: i64) -> LullabyResult<Vec<StoredStory>>;

    /// Stories matching category and score bounds.
    async fn filter_stories(&self, filter: &StoryFilter) -> LullabyResult<Vec<StoredStory>>;

    /// Delete a story. Returns `false` if nothing was deleted.
    async fn delete_story(&self, id: i32) -> LullabyResult<bool>;

    /// Aggregate numbers across all stories.
    async fn statistics(&self) -> LullabyResult<StoryStatistics>;
}
