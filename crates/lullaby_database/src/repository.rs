//! SQLite implementation of StoryRepository.

use crate::{DatabaseResult, establish_connection, story_management};
use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use lullaby_core::{StoredStory, StoryFilter, StoryOutcome, StoryStatistics};
use lullaby_error::LullabyResult;
use lullaby_interface::StoryRepository;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SQLite-backed story repository.
///
/// The connection sits behind an async mutex so the repository can be
/// shared across tasks.
///
/// # Example
///
/// ```no_run
/// use lullaby_database::SqliteStoryRepository;
/// use lullaby_interface::StoryRepository;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = SqliteStoryRepository::open("stories.db")?;
/// let stats = repo.statistics().await?;
/// println!("{} stories saved", stats.total_stories);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SqliteStoryRepository {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl SqliteStoryRepository {
    /// Wrap an open connection.
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open (and migrate) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DatabaseResult<Self> {
        Ok(Self::new(establish_connection(path)?))
    }

    /// Share an existing connection.
    pub fn from_arc(conn: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl StoryRepository for SqliteStoryRepository {
    async fn save_story(&self, outcome: &StoryOutcome) -> LullabyResult<i32> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::insert_story(&mut conn, outcome)?)
    }

    async fn get_story(&self, id: i32) -> LullabyResult<Option<StoredStory>> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::get_story(&mut conn, id)?)
    }

    async fn list_stories(&self, limit: i64, offset: i64) -> LullabyResult<Vec<StoredStory>> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::list_stories(&mut conn, limit, offset)?)
    }

    async fn search_stories(&self, query: &str, limit: i64) -> LullabyResult<Vec<StoredStory>> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::search_stories(&mut conn, query, limit)?)
    }

    async fn filter_stories(&self, filter: &StoryFilter) -> LullabyResult<Vec<StoredStory>> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::filter_stories(&mut conn, filter)?)
    }

    async fn delete_story(&self, id: i32) -> LullabyResult<bool> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::delete_story(&mut conn, id)?)
    }

    async fn statistics(&self) -> LullabyResult<StoryStatistics> {
        let mut conn = self.conn.lock().await;
        Ok(story_management::story_statistics(&mut conn)?)
    }
}
