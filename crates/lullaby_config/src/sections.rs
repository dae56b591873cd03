//! Configuration sections.
//!
//! Every section falls back to its built-in defaults field by field, so a
//! user file only needs the keys it changes.

use lullaby_core::{Category, StoryArc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Chat model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier sent with every request
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Chat-completions endpoint and client-side limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Full chat-completions URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Requests allowed per minute, zero for unpaced
    pub requests_per_minute: u32,
    /// Requests allowed in flight at once
    pub max_concurrent: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            requests_per_minute: 60,
            max_concurrent: 2,
        }
    }
}

/// Storyteller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Youngest target reader
    pub target_age_min: u32,
    /// Oldest target reader
    pub target_age_max: u32,
    /// Sampling temperature for story generation
    pub storyteller_temperature: f32,
    /// Token budget for a story
    pub max_story_tokens: u32,
    /// Arc used unless a persona overrides it
    pub story_arc_type: StoryArc,
    /// Vocabulary guidance for the storyteller
    pub vocabulary_complexity: String,
    /// Sentence length guidance for the storyteller
    pub sentence_length: String,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            target_age_min: 5,
            target_age_max: 10,
            storyteller_temperature: 0.8,
            max_story_tokens: 1500,
            story_arc_type: StoryArc::HeroJourney,
            vocabulary_complexity: "simple to moderate".to_string(),
            sentence_length: "short to medium".to_string(),
        }
    }
}

/// Judge settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Sampling temperature for evaluations
    pub judge_temperature: f32,
    /// Token budget for an evaluation
    pub max_judge_tokens: u32,
    /// How demanding the judge should be, 1-10
    pub strictness_level: u8,
    /// Score a story needs to be accepted
    pub minimum_acceptance_score: f64,
    /// Upper bound on judge calls in the refinement loop
    pub max_revision_attempts: u32,
    /// Criteria listed in the judge prompt
    pub evaluation_criteria: Vec<String>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            judge_temperature: 0.3,
            max_judge_tokens: 800,
            strictness_level: 7,
            minimum_acceptance_score: 7.0,
            max_revision_attempts: 3,
            evaluation_criteria: [
                "Age-appropriateness",
                "Story structure",
                "Character development",
                "Moral value",
                "Engagement level",
                "Language complexity",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Guardrail switches and the themes rendered into the safety guidelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Run the content-safety check
    pub enable_content_filter: bool,
    /// Run the age-appropriateness heuristics
    pub enable_age_check: bool,
    /// Ask the model before falling back to keywords
    pub use_llm_guardrails: bool,
    /// Themes stories must avoid
    pub prohibited_themes: Vec<String>,
    /// Elements stories must contain
    pub required_elements: Vec<String>,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            enable_content_filter: true,
            enable_age_check: true,
            use_llm_guardrails: true,
            prohibited_themes: [
                "violence",
                "fear",
                "scary monsters",
                "dangerous situations",
                "inappropriate language",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            required_elements: [
                "positive resolution",
                "kindness",
                "friendship",
                "learning experiences",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Focus and tone the storyteller uses for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStrategy {
    /// What the story centers on
    pub focus: String,
    /// Default tone when the request names none
    pub tone: String,
}

impl CategoryStrategy {
    fn new(focus: &str, tone: &str) -> Self {
        Self {
            focus: focus.to_string(),
            tone: tone.to_string(),
        }
    }
}

/// Pipeline switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Run the judge and revise loop
    pub enable_iterative_refinement: bool,
    /// Categorize requests with the model
    pub enable_categorization: bool,
    /// Offer a user change request after generation
    pub enable_user_feedback: bool,
    /// Strategy per category name
    pub category_strategies: BTreeMap<String, CategoryStrategy>,
}

impl OrchestrationConfig {
    /// Strategy for `category`, falling back to the `default` entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_config::OrchestrationConfig;
    /// use lullaby_core::Category;
    ///
    /// let config = OrchestrationConfig::default();
    /// assert_eq!(config.strategy_for(Category::Default).tone, "uplifting");
    /// ```
    pub fn strategy_for(&self, category: Category) -> CategoryStrategy {
        self.category_strategies
            .get(category.as_ref())
            .or_else(|| self.category_strategies.get(Category::Default.as_ref()))
            .cloned()
            .unwrap_or_else(|| {
                CategoryStrategy::new("a positive story with a valuable lesson", "uplifting")
            })
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        let category_strategies = [
            (
                Category::Adventure,
                "exciting journey and discovery",
                "adventurous yet safe",
            ),
            (
                Category::Friendship,
                "the power of friendship and helping each other",
                "warm and heartfelt",
            ),
            (
                Category::Fantasy,
                "magical worlds and gentle wonder",
                "whimsical and enchanting",
            ),
            (
                Category::Animals,
                "animal characters learning valuable lessons",
                "playful and gentle",
            ),
            (
                Category::Default,
                "a positive story with a valuable lesson",
                "uplifting",
            ),
        ]
        .into_iter()
        .map(|(category, focus, tone)| {
            (category.to_string(), CategoryStrategy::new(focus, tone))
        })
        .collect();

        Self {
            enable_iterative_refinement: true,
            enable_categorization: true,
            enable_user_feedback: true,
            category_strategies,
        }
    }
}

/// Story history database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Save finished stories
    pub enabled: bool,
    /// SQLite database file
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: PathBuf::from("stories.db"),
        }
    }
}
