//! SQLite backend for the dashboard.

use crate::{StoryQuery, TuiBackend};
use diesel::SqliteConnection;
use lullaby_core::{StoredStory, StoryFilter, StoryStatistics};
use lullaby_database::{
    default_export_filename, delete_story, establish_connection, export_stories_json,
    filter_stories, list_stories, search_stories, story_statistics,
};
use lullaby_error::{TuiError, TuiErrorKind, TuiResult};
use std::path::{Path, PathBuf};

/// Dashboard backend over the story database.
pub struct DatabaseBackend {
    connection: SqliteConnection,
    export_dir: PathBuf,
}

impl DatabaseBackend {
    /// Open the database at `path`. Exports land in the current directory.
    pub fn open(path: impl AsRef<Path>) -> TuiResult<Self> {
        let connection = establish_connection(path).map_err(|e| {
            TuiError::new(TuiErrorKind::Storage(format!(
                "Failed to open story database: {}",
                e
            )))
        })?;

        Ok(Self {
            connection,
            export_dir: PathBuf::from("."),
        })
    }

    /// Write exports into `dir` instead of the current directory.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}

fn storage_error(action: &str, e: impl std::fmt::Display) -> TuiError {
    TuiError::new(TuiErrorKind::Storage(format!("Failed to {}: {}", action, e)))
}

impl TuiBackend for DatabaseBackend {
    fn load_stories(&mut self, query: &StoryQuery, limit: i64) -> TuiResult<Vec<StoredStory>> {
        let result = match query {
            StoryQuery::All => list_stories(&mut self.connection, limit, 0),
            StoryQuery::Search(text) => search_stories(&mut self.connection, text, limit),
            StoryQuery::Category(category) => {
                let filter = StoryFilter::default()
                    .with_category(Some(*category))
                    .with_limit(limit);
                filter_stories(&mut self.connection, &filter)
            }
        };
        result.map_err(|e| storage_error("load stories", e))
    }

    fn delete_story(&mut self, id: i32) -> TuiResult<bool> {
        delete_story(&mut self.connection, id).map_err(|e| storage_error("delete story", e))
    }

    fn statistics(&mut self) -> TuiResult<StoryStatistics> {
        story_statistics(&mut self.connection).map_err(|e| storage_error("compute statistics", e))
    }

    fn export_stories(&mut self, stories: &[StoredStory]) -> TuiResult<PathBuf> {
        let json = export_stories_json(stories).map_err(|e| storage_error("serialize stories", e))?;
        let path = self.export_dir.join(default_export_filename());
        std::fs::write(&path, json).map_err(|e| {
            TuiError::new(TuiErrorKind::Export(format!("{}: {}", path.display(), e)))
        })?;
        tracing::info!(path = %path.display(), count = stories.len(), "Exported stories");
        Ok(path)
    }
}
