//! Pipeline results and persisted story records.

use crate::{Categorization, Category, ParentSettings, ValidationReport, VarietyConfig};
use chrono::NaiveDateTime;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Final result of the story pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryOutcome {
    /// Final story text
    pub story: String,
    /// Request the story was written for
    pub user_request: String,
    /// Category of the last accepted draft
    pub category: Category,
    /// Categorization of the last accepted draft
    pub categorization: Categorization,
    /// Variety choices used for every draft
    pub variety_config: VarietyConfig,
    /// Number of accepted revisions
    pub revision_count: u32,
    /// Final overall judge score
    pub judge_score: f64,
    /// Final detailed judge feedback
    pub judge_feedback: String,
    /// Final guardrail report
    pub validation: ValidationReport,
    /// Passed the final guardrail checks
    pub is_valid: bool,
    /// Final score reached the acceptance threshold
    pub meets_quality_threshold: bool,
    /// Parent settings in effect
    pub parent_settings: ParentSettings,
    /// Storage id, when saved
    pub story_id: Option<i32>,
    /// A user feedback revision replaced the story
    #[serde(default)]
    pub user_feedback_applied: bool,
    /// Changes the user asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_requested_changes: Option<String>,
}

/// A story loaded back from storage with its JSON columns decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredStory {
    /// Row id
    pub id: i32,
    /// Story text
    pub story_text: String,
    /// Original request
    pub user_request: String,
    /// Category, `Default` if the stored name is unknown
    pub category: Category,
    /// Categorization details
    pub categorization: Categorization,
    /// Overall judge score
    pub judge_score: f64,
    /// Detailed judge feedback
    pub judge_feedback: String,
    /// Accepted revisions
    pub revision_count: i32,
    /// Passed guardrails
    pub is_valid: bool,
    /// Reached the acceptance threshold
    pub meets_quality_threshold: bool,
    /// Guardrail report
    pub validation: ValidationReport,
    /// Parent settings in effect
    pub parent_settings: ParentSettings,
    /// Variety choices, absent for rows without one
    pub variety_config: Option<VarietyConfig>,
    /// User requested changes that were applied
    pub user_feedback: Option<String>,
    /// Insert time (UTC)
    pub created_at: NaiveDateTime,
    /// SHA-256 hex digest of the story text
    pub story_hash: String,
}

/// Aggregate numbers across all stored stories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoryStatistics {
    /// Number of stories
    pub total_stories: i64,
    /// Average of positive judge scores, two decimals
    pub average_score: f64,
    /// `(category, count)` ordered by count descending
    pub category_distribution: Vec<(String, i64)>,
    /// Stories that reached the acceptance threshold
    pub stories_meeting_threshold: i64,
    /// Average revisions per story, two decimals
    pub average_revisions: f64,
}

/// Criteria for narrowing the story history.
///
/// # Examples
///
/// ```
/// use lullaby_core::{Category, StoryFilter};
///
/// let filter = StoryFilter::default()
///     .with_category(Some(Category::Animals))
///     .with_min_score(Some(7.0));
/// assert_eq!(*filter.limit(), 50);
/// assert_eq!(*filter.category(), Some(Category::Animals));
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct StoryFilter {
    /// Only this category
    category: Option<Category>,
    /// Minimum judge score, inclusive
    min_score: Option<f64>,
    /// Maximum judge score, inclusive
    max_score: Option<f64>,
    /// Maximum rows returned
    limit: i64,
}

impl Default for StoryFilter {
    fn default() -> Self {
        Self {
            category: None,
            min_score: None,
            max_score: None,
            limit: 50,
        }
    }
}
