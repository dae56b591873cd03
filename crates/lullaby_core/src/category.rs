//! Story categories and request categorization results.

use serde::{Deserialize, Serialize};

/// Broad story category used to pick a focus and tone.
///
/// Parsing is case-insensitive; unknown names are rejected so callers can
/// decide how to fall back.
///
/// # Examples
///
/// ```
/// use lullaby_core::Category;
/// use std::str::FromStr;
///
/// assert_eq!(Category::from_str("Fantasy").unwrap(), Category::Fantasy);
/// assert!(Category::from_str("horror").is_err());
/// assert_eq!(Category::Animals.to_string(), "animals");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    /// Journeys, quests, and discovery
    Adventure,
    /// Friends helping each other
    Friendship,
    /// Magic, dragons, castles
    Fantasy,
    /// Animal protagonists
    Animals,
    /// Anything else
    #[default]
    Default,
}

/// Key story elements extracted from a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Categorization {
    /// Chosen category
    pub category: Category,
    /// Characters mentioned or implied
    #[serde(default)]
    pub characters: Vec<String>,
    /// Main theme
    #[serde(default)]
    pub theme: String,
    /// Setting, or "any"
    #[serde(default)]
    pub setting: String,
    /// Special elements to include
    #[serde(default)]
    pub elements: Vec<String>,
    /// Tone preference, "neutral" when none was given
    #[serde(default = "neutral_tone")]
    pub tone: String,
    /// Raw model analysis, or a marker for non-model categorizations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
}

fn neutral_tone() -> String {
    "neutral".to_string()
}

impl Categorization {
    /// Neutral categorization used when categorization is switched off.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_core::{Categorization, Category};
    ///
    /// let c = Categorization::disabled();
    /// assert_eq!(c.category, Category::Default);
    /// assert_eq!(c.tone, "neutral");
    /// assert!(c.characters.is_empty());
    /// ```
    pub fn disabled() -> Self {
        Self {
            category: Category::Default,
            tone: neutral_tone(),
            ..Self::default()
        }
    }

    /// Categorization produced without a model, tagged with a marker.
    pub fn fallback(category: Category) -> Self {
        Self {
            category,
            tone: neutral_tone(),
            raw_analysis: Some("Fallback categorization".to_string()),
            ..Self::default()
        }
    }
}
