//! Parent-facing personalization settings.

use serde::{Deserialize, Serialize};

/// Storytelling voice a parent can pick.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Persona {
    /// Bold journeys and discovery
    AdventurousExplorer,
    /// Whimsy and imagination
    CreativeDreamer,
    /// Soft, soothing warmth
    GentleFriend,
    /// Wonder and learning
    CuriousLearner,
    /// A bit of everything
    #[default]
    BalancedStoryteller,
}

/// Value a parent wants the story to reinforce.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoryValue {
    Kindness,
    Friendship,
    Courage,
    Honesty,
    Empathy,
    Perseverance,
    Gratitude,
}

/// Topic the child enjoys.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Interest {
    Animals,
    Space,
    Dinosaurs,
    Princesses,
    Superheroes,
    Nature,
    Music,
    Art,
}

/// Overall story arc template.
///
/// # Examples
///
/// ```
/// use lullaby_core::StoryArc;
/// use std::str::FromStr;
///
/// assert_eq!(StoryArc::from_str("three_act").unwrap(), StoryArc::ThreeAct);
/// assert_eq!(StoryArc::HeroJourney.to_string(), "hero_journey");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoryArc {
    /// Call to adventure, journey, return
    #[default]
    HeroJourney,
    /// Setup, confrontation, resolution
    ThreeAct,
    /// Beginning, challenge, happy ending
    SimpleAdventure,
}

/// Personalization chosen by a parent.
///
/// # Examples
///
/// ```
/// use lullaby_core::{ParentSettings, Persona, StoryValue};
///
/// let settings = ParentSettings::default();
/// assert_eq!(settings.persona, Persona::BalancedStoryteller);
/// assert_eq!(settings.values, vec![StoryValue::Kindness, StoryValue::Friendship]);
/// assert!(settings.child_name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSettings {
    /// Storytelling voice
    #[serde(default)]
    pub persona: Persona,
    /// Values to emphasize
    #[serde(default)]
    pub values: Vec<StoryValue>,
    /// Child's interests
    #[serde(default)]
    pub interests: Vec<Interest>,
    /// Child's name, possibly used for a character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    /// Free-form extra elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_elements: Option<String>,
}

impl Default for ParentSettings {
    fn default() -> Self {
        Self {
            persona: Persona::BalancedStoryteller,
            values: vec![StoryValue::Kindness, StoryValue::Friendship],
            interests: Vec::new(),
            child_name: None,
            custom_elements: None,
        }
    }
}
