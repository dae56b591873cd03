//! Diesel models for the stories table.

use crate::DatabaseResult;
use crate::schema::stories;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use lullaby_core::{Category, StoredStory, StoryOutcome};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Database row for the stories table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoryRow {
    pub id: i32,
    pub story_text: String,
    pub user_request: String,
    pub category: String,
    pub categorization: String,
    pub judge_score: f64,
    pub judge_feedback: String,
    pub revision_count: i32,
    pub is_valid: bool,
    pub meets_quality_threshold: bool,
    pub validation: String,
    pub parent_settings: String,
    pub variety_config: Option<String>,
    pub user_feedback: Option<String>,
    pub created_at: NaiveDateTime,
    pub story_hash: String,
}

/// Insertable struct for the stories table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stories)]
pub struct NewStoryRow {
    pub story_text: String,
    pub user_request: String,
    pub category: String,
    pub categorization: String,
    pub judge_score: f64,
    pub judge_feedback: String,
    pub revision_count: i32,
    pub is_valid: bool,
    pub meets_quality_threshold: bool,
    pub validation: String,
    pub parent_settings: String,
    pub variety_config: Option<String>,
    pub user_feedback: Option<String>,
    pub story_hash: String,
}

/// SHA-256 hex digest of a story.
///
/// # Examples
///
/// ```
/// use lullaby_database::story_hash;
///
/// let hash = story_hash("Once upon a time");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, story_hash("Once upon a time"));
/// ```
pub fn story_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

impl NewStoryRow {
    /// Row for a finished pipeline outcome.
    pub fn from_outcome(outcome: &StoryOutcome) -> DatabaseResult<Self> {
        let user_feedback = if outcome.user_feedback_applied {
            outcome.user_requested_changes.clone()
        } else {
            None
        };

        Ok(Self {
            story_text: outcome.story.clone(),
            user_request: outcome.user_request.clone(),
            category: outcome.category.to_string(),
            categorization: serde_json::to_string(&outcome.categorization)?,
            judge_score: outcome.judge_score,
            judge_feedback: outcome.judge_feedback.clone(),
            revision_count: i32::try_from(outcome.revision_count).unwrap_or(i32::MAX),
            is_valid: outcome.is_valid,
            meets_quality_threshold: outcome.meets_quality_threshold,
            validation: serde_json::to_string(&outcome.validation)?,
            parent_settings: serde_json::to_string(&outcome.parent_settings)?,
            variety_config: Some(serde_json::to_string(&outcome.variety_config)?),
            user_feedback,
            story_hash: story_hash(&outcome.story),
        })
    }
}

impl StoryRow {
    /// Decode the JSON columns.
    pub fn into_stored(self) -> DatabaseResult<StoredStory> {
        let variety_config = self
            .variety_config
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(StoredStory {
            id: self.id,
            category: Category::from_str(&self.category).unwrap_or_default(),
            categorization: serde_json::from_str(&self.categorization)?,
            validation: serde_json::from_str(&self.validation)?,
            parent_settings: serde_json::from_str(&self.parent_settings)?,
            variety_config,
            story_text: self.story_text,
            user_request: self.user_request,
            judge_score: self.judge_score,
            judge_feedback: self.judge_feedback,
            revision_count: self.revision_count,
            is_valid: self.is_valid,
            meets_quality_threshold: self.meets_quality_threshold,
            user_feedback: self.user_feedback,
            created_at: self.created_at,
            story_hash: self.story_hash,
        })
    }
}
