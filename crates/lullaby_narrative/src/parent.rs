//! Parent personalization and the technical overrides it implies.

use crate::NarrativeStyleKind;
use crate::validation::validate_parent_settings;
use derive_getters::Getters;
use lullaby_core::{Interest, ParentSettings, Persona, StoryArc, StoryValue};
use lullaby_error::{LullabyResult, StoryError, StoryErrorKind};
use std::fmt::Display;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// What a persona means for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaProfile {
    /// Display name
    pub name: &'static str,
    /// One-line description for menus
    pub description: &'static str,
    /// Temperature override; `None` keeps the configured value
    pub storyteller_temperature: Option<f32>,
    /// Arc override; `None` keeps the configured arc
    pub story_arc: Option<StoryArc>,
    /// Narrative style drawn most often
    pub narrative_style: NarrativeStyleKind,
    /// Voice instruction added to the story prompt
    pub prompt: &'static str,
}

/// Profile for `persona`.
///
/// # Examples
///
/// ```
/// use lullaby_core::{Persona, StoryArc};
/// use lullaby_narrative::persona_profile;
///
/// let profile = persona_profile(Persona::GentleFriend);
/// assert_eq!(profile.story_arc, Some(StoryArc::ThreeAct));
/// assert!(persona_profile(Persona::BalancedStoryteller).storyteller_temperature.is_none());
/// ```
pub fn persona_profile(persona: Persona) -> PersonaProfile {
    match persona {
        Persona::AdventurousExplorer => PersonaProfile {
            name: "Adventurous Explorer",
            description: "Bold journeys, brave heroes, and exciting discoveries",
            storyteller_temperature: Some(0.9),
            story_arc: Some(StoryArc::HeroJourney),
            narrative_style: NarrativeStyleKind::ActionOriented,
            prompt: "Tell the story with energy and a sense of discovery. Let the hero be brave, curious, and eager to explore.",
        },
        Persona::CreativeDreamer => PersonaProfile {
            name: "Creative Dreamer",
            description: "Imaginative worlds full of whimsy and wonder",
            storyteller_temperature: Some(0.95),
            story_arc: Some(StoryArc::SimpleAdventure),
            narrative_style: NarrativeStyleKind::Descriptive,
            prompt: "Tell the story with imagination and whimsy. Fill the world with surprising, dreamlike details.",
        },
        Persona::GentleFriend => PersonaProfile {
            name: "Gentle Friend",
            description: "Soft, soothing stories about caring and belonging",
            storyteller_temperature: Some(0.7),
            story_arc: Some(StoryArc::ThreeAct),
            narrative_style: NarrativeStyleKind::Conversational,
            prompt: "Tell the story in a calm, soothing voice. Focus on warmth, comfort, and caring friendships.",
        },
        Persona::CuriousLearner => PersonaProfile {
            name: "Curious Learner",
            description: "Stories that spark questions and teach something new",
            storyteller_temperature: Some(0.75),
            story_arc: Some(StoryArc::ThreeAct),
            narrative_style: NarrativeStyleKind::Reflective,
            prompt: "Tell the story so it sparks curiosity. Weave in a simple, true fact about the world that the characters discover together.",
        },
        Persona::BalancedStoryteller => PersonaProfile {
            name: "Balanced Storyteller",
            description: "A little bit of everything",
            storyteller_temperature: None,
            story_arc: None,
            narrative_style: NarrativeStyleKind::Balanced,
            prompt: "Tell the story with a balance of adventure, heart, and gentle humor.",
        },
    }
}

/// Prompt phrase for a value.
pub fn value_phrase(value: StoryValue) -> &'static str {
    match value {
        StoryValue::Kindness => "being kind to others",
        StoryValue::Friendship => "the importance of friendship",
        StoryValue::Courage => "finding courage when things feel hard",
        StoryValue::Honesty => "telling the truth",
        StoryValue::Empathy => "understanding how others feel",
        StoryValue::Perseverance => "not giving up",
        StoryValue::Gratitude => "being thankful for what we have",
    }
}

/// Prompt phrase for an interest.
pub fn interest_phrase(interest: Interest) -> &'static str {
    match interest {
        Interest::Animals => "friendly animals",
        Interest::Space => "stars, planets, and space travel",
        Interest::Dinosaurs => "gentle dinosaurs",
        Interest::Princesses => "princesses and castles",
        Interest::Superheroes => "kind-hearted superheroes",
        Interest::Nature => "forests, gardens, and the outdoors",
        Interest::Music => "songs and music",
        Interest::Art => "painting, drawing, and making things",
    }
}

/// Settings the storyteller applies on top of configuration.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct TechnicalOverrides {
    /// Temperature to use instead of the configured one
    storyteller_temperature: Option<f32>,
    /// Arc to use instead of the configured one
    story_arc: Option<StoryArc>,
    /// Narrative style to favor in variety draws
    narrative_style_preference: NarrativeStyleKind,
    /// PARENT PREFERENCES block, empty when there is nothing to add
    custom_prompts: String,
}

/// Translate parent settings into generation overrides.
///
/// # Examples
///
/// ```
/// use lullaby_core::{Interest, ParentSettings, Persona};
/// use lullaby_narrative::{NarrativeStyleKind, apply_parent_settings};
///
/// let settings = ParentSettings {
///     persona: Persona::CreativeDreamer,
///     interests: vec![Interest::Space],
///     child_name: Some("Mia".to_string()),
///     ..ParentSettings::default()
/// };
/// let overrides = apply_parent_settings(&settings);
/// assert_eq!(*overrides.storyteller_temperature(), Some(0.95));
/// assert_eq!(*overrides.narrative_style_preference(), NarrativeStyleKind::Descriptive);
/// assert!(overrides.custom_prompts().contains("Mia"));
/// assert!(overrides.custom_prompts().contains("space travel"));
/// ```
pub fn apply_parent_settings(settings: &ParentSettings) -> TechnicalOverrides {
    let profile = persona_profile(settings.persona);
    let mut lines = vec![format!("STORYTELLING VOICE: {}", profile.prompt)];

    if !settings.values.is_empty() {
        let phrases: Vec<_> = settings.values.iter().map(|v| value_phrase(*v)).collect();
        lines.push(format!("VALUES TO EMPHASIZE: {}", phrases.join("; ")));
    }
    if !settings.interests.is_empty() {
        let phrases: Vec<_> = settings
            .interests
            .iter()
            .map(|i| interest_phrase(*i))
            .collect();
        lines.push(format!(
            "CHILD'S INTERESTS: Include {} where it fits naturally",
            phrases.join(", ")
        ));
    }
    if let Some(name) = non_blank(&settings.child_name) {
        lines.push(format!(
            "CHILD'S NAME: Consider giving a main character the name {name}"
        ));
    }
    if let Some(elements) = non_blank(&settings.custom_elements) {
        lines.push(format!("CUSTOM ELEMENTS: {elements}"));
    }

    TechnicalOverrides {
        storyteller_temperature: profile.storyteller_temperature,
        story_arc: profile.story_arc,
        narrative_style_preference: profile.narrative_style,
        custom_prompts: lines.join("\n"),
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Raw, string-typed parent settings as entered on a command line or form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentSettingsInput {
    /// Persona name
    pub persona: Option<String>,
    /// Value names; empty keeps the defaults
    pub values: Vec<String>,
    /// Interest names
    pub interests: Vec<String>,
    /// Child's name
    pub child_name: Option<String>,
    /// Extra story elements
    pub custom_elements: Option<String>,
}

fn parse_one<T>(kind: &str, raw: &str) -> LullabyResult<T>
where
    T: FromStr + IntoEnumIterator + Display,
{
    T::from_str(raw.trim()).map_err(|_| {
        let valid: Vec<String> = T::iter().map(|t| t.to_string()).collect();
        StoryError::new(StoryErrorKind::InvalidParentSettings(format!(
            "Invalid {kind}: {raw}. Must be one of: {}",
            valid.join(", ")
        )))
        .into()
    })
}

/// Parse raw parent settings into typed settings and validate them.
///
/// # Errors
///
/// Returns [`StoryErrorKind::InvalidParentSettings`] naming the valid choices
/// when a persona, value, or interest is unknown, or when the child name is
/// too long.
///
/// # Examples
///
/// ```
/// use lullaby_core::{Persona, StoryValue};
/// use lullaby_narrative::{ParentSettingsInput, parse_parent_settings};
///
/// let input = ParentSettingsInput {
///     persona: Some("gentle_friend".to_string()),
///     values: vec!["courage".to_string()],
///     ..ParentSettingsInput::default()
/// };
/// let settings = parse_parent_settings(&input).unwrap();
/// assert_eq!(settings.persona, Persona::GentleFriend);
/// assert_eq!(settings.values, vec![StoryValue::Courage]);
///
/// let bad = ParentSettingsInput {
///     persona: Some("pirate".to_string()),
///     ..ParentSettingsInput::default()
/// };
/// assert!(parse_parent_settings(&bad).is_err());
/// ```
pub fn parse_parent_settings(input: &ParentSettingsInput) -> LullabyResult<ParentSettings> {
    let defaults = ParentSettings::default();

    let persona = match &input.persona {
        Some(raw) => parse_one::<Persona>("persona", raw)?,
        None => defaults.persona,
    };
    let values = if input.values.is_empty() {
        defaults.values
    } else {
        input
            .values
            .iter()
            .map(|raw| parse_one::<StoryValue>("value", raw))
            .collect::<LullabyResult<Vec<_>>>()?
    };
    let interests = input
        .interests
        .iter()
        .map(|raw| parse_one::<Interest>("interest", raw))
        .collect::<LullabyResult<Vec<_>>>()?;

    let settings = ParentSettings {
        persona,
        values,
        interests,
        child_name: input.child_name.clone(),
        custom_elements: input.custom_elements.clone(),
    };
    validate_parent_settings(&settings)?;
    Ok(settings)
}
