//! JSON export of story history.

use crate::DatabaseResult;
use lullaby_core::StoredStory;

/// Pretty-printed JSON array of `stories`.
pub fn export_stories_json(stories: &[StoredStory]) -> DatabaseResult<String> {
    Ok(serde_json::to_string_pretty(stories)?)
}

/// `stories_export_YYYYmmdd_HHMMSS.json` for the current local time.
///
/// # Examples
///
/// ```
/// let name = lullaby_database::default_export_filename();
/// assert!(name.starts_with("stories_export_"));
/// assert!(name.ends_with(".json"));
/// ```
pub fn default_export_filename() -> String {
    format!(
        "stories_export_{}.json",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}
