//! Random storytelling variety.
//!
//! Each story gets one [`VarietyConfig`] drawn from the tables below. The
//! same config is reused for every revision of that story so rewrites keep
//! their voice.

use lullaby_core::{DescribedStyle, NamedStyle, NarrativeStyle, VarietyConfig};
use rand::Rng;
use rand::seq::SliceRandom;

/// Probability that a preferred narrative style is used outright.
const PREFERENCE_WEIGHT: f64 = 0.7;

/// Narrative style keys, as used for persona preferences.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NarrativeStyleKind {
    /// Dialogue-heavy
    Conversational,
    /// World-building and description
    Descriptive,
    /// Events and movement
    ActionOriented,
    /// Thoughts and feelings
    Reflective,
    /// Even mix
    Balanced,
}

struct StyleRow {
    kind: NarrativeStyleKind,
    name: &'static str,
    description: &'static str,
    dialogue_ratio: f64,
    tone_instruction: &'static str,
    opening_style: &'static str,
}

const NARRATIVE_STYLES: [StyleRow; 5] = [
    StyleRow {
        kind: NarrativeStyleKind::Conversational,
        name: "Conversational",
        description: "Heavy on dialogue, characters talk to each other naturally",
        dialogue_ratio: 0.5,
        tone_instruction: "Use lots of dialogue and conversations between characters. Show relationships through what they say to each other.",
        opening_style: "Start with characters talking or a conversation",
    },
    StyleRow {
        kind: NarrativeStyleKind::Descriptive,
        name: "Descriptive",
        description: "Rich world-building and vivid descriptions",
        dialogue_ratio: 0.2,
        tone_instruction: "Focus on describing the world, setting, and atmosphere. Paint vivid pictures with words. Show what things look, feel, and sound like.",
        opening_style: "Start with a detailed description of the setting or world",
    },
    StyleRow {
        kind: NarrativeStyleKind::ActionOriented,
        name: "Action-Oriented",
        description: "Focus on what happens, movement and events",
        dialogue_ratio: 0.3,
        tone_instruction: "Focus on action and what characters do. Show movement, activities, and events happening. Keep the pace moving.",
        opening_style: "Start with something happening or an action",
    },
    StyleRow {
        kind: NarrativeStyleKind::Reflective,
        name: "Reflective",
        description: "Characters think and feel, internal thoughts",
        dialogue_ratio: 0.35,
        tone_instruction: "Include characters' thoughts and feelings. Show what they're thinking about. Balance action with reflection.",
        opening_style: "Start with a character's thoughts or feelings about something",
    },
    StyleRow {
        kind: NarrativeStyleKind::Balanced,
        name: "Balanced",
        description: "Mix of dialogue, description, and action",
        dialogue_ratio: 0.4,
        tone_instruction: "Balance dialogue, description, and action. Mix conversations with world-building and events.",
        opening_style: "Start with a balanced mix of setting and character introduction",
    },
];

// (name, description, instruction)
const PERSPECTIVES: [(&str, &str, &str); 4] = [
    (
        "Third Person (All-Knowing)",
        "Narrator knows everything, can show multiple characters' thoughts",
        "Use third person narration where the narrator knows what all characters are thinking and feeling. Use 'he', 'she', 'they'.",
    ),
    (
        "Third Person (One Character)",
        "Follow one main character, see through their eyes",
        "Use third person but focus on one main character. Show the story through their perspective. Use 'he', 'she', 'they' but only reveal what the main character knows.",
    ),
    (
        "First Person",
        "Story told by a character using 'I'",
        "Tell the story in first person from a character's perspective. Use 'I', 'me', 'my'. The character is telling their own story.",
    ),
    (
        "Second Person (Interactive)",
        "Addresses the reader as 'you', making them part of the story",
        "Tell the story using 'you' to address the reader. Make the reader feel like they're part of the adventure. Use 'you', 'your'.",
    ),
];

const STRUCTURES: [(&str, &str, &str); 4] = [
    (
        "Linear",
        "Events happen in chronological order",
        "Tell the story in chronological order from beginning to end.",
    ),
    (
        "Start in the Middle",
        "Begin with action, then explain how we got there",
        "Start the story in the middle of an exciting moment, then go back to show how the characters got there, then continue forward.",
    ),
    (
        "With Flashback",
        "Include a meaningful memory or past event",
        "Include a flashback to an earlier time that helps explain the current situation or character motivations.",
    ),
    (
        "Parallel Stories",
        "Follow multiple characters or storylines",
        "Follow two or more characters or storylines that eventually come together. Show what different characters are doing.",
    ),
];

const OPENINGS: [&str; 8] = [
    "Start with a character doing something ordinary that becomes extraordinary",
    "Start with a question or mystery",
    "Start with dialogue - someone saying something interesting",
    "Start with a description of an unusual place or object",
    "Start with a character's wish or dream",
    "Start with an action - something happening right away",
    "Start with a sound or sensation",
    "Start with a character's name and what makes them special",
];

// (name, instruction)
const DIALOGUE_STYLES: [(&str, &str); 4] = [
    (
        "Natural Conversation",
        "Characters speak naturally, like real people. Use contractions, simple words, and natural flow.",
    ),
    (
        "Playful and Fun",
        "Characters use playful language, jokes, and fun expressions. Keep it light and cheerful.",
    ),
    (
        "Thoughtful and Reflective",
        "Characters think before they speak. Their dialogue shows their thinking process and feelings.",
    ),
    (
        "Energetic and Excited",
        "Characters speak with energy and excitement. Use exclamations and enthusiastic language.",
    ),
];

const WORLD_BUILDING_FOCUS: [&str; 6] = [
    "Focus on creating a vivid, interesting world with unique details",
    "Describe the environment and setting in detail",
    "Show how the world works - its rules, magic, or special features",
    "Include sensory details - what things look, sound, feel, smell like",
    "Create interesting places and locations",
    "Show the relationship between characters and their world",
];

const MORAL_STYLES: [(&str, &str); 4] = [
    (
        "Show, Don't Tell",
        "Show the moral through actions and events, don't state it directly. Let readers discover the lesson through what happens.",
    ),
    (
        "Embedded in Story",
        "Weave the lesson naturally into the story events. Make it part of the plot, not a separate message.",
    ),
    (
        "Through Character Growth",
        "Show the lesson through how a character changes or grows. The moral comes from their journey.",
    ),
    (
        "Subtle and Implied",
        "Hint at the lesson but don't state it explicitly. Let it emerge naturally from the story.",
    ),
];

fn style(row: &StyleRow) -> NarrativeStyle {
    NarrativeStyle {
        name: row.name.to_string(),
        description: row.description.to_string(),
        dialogue_ratio: row.dialogue_ratio,
        tone_instruction: row.tone_instruction.to_string(),
        opening_style: row.opening_style.to_string(),
    }
}

fn described((name, description, instruction): (&str, &str, &str)) -> DescribedStyle {
    DescribedStyle {
        name: name.to_string(),
        description: description.to_string(),
        instruction: instruction.to_string(),
    }
}

fn named((name, instruction): (&str, &str)) -> NamedStyle {
    NamedStyle {
        name: name.to_string(),
        instruction: instruction.to_string(),
    }
}

fn pick<'a, T, R: Rng>(items: &'a [T], rng: &mut R) -> &'a T {
    // Tables are non-empty constants.
    items.choose(rng).unwrap_or(&items[0])
}

/// Look up a narrative style by key.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::{NarrativeStyleKind, narrative_style};
///
/// let style = narrative_style(NarrativeStyleKind::Conversational);
/// assert_eq!(style.dialogue_ratio, 0.5);
/// ```
pub fn narrative_style(kind: NarrativeStyleKind) -> NarrativeStyle {
    style(
        NARRATIVE_STYLES
            .iter()
            .find(|row| row.kind == kind)
            .unwrap_or(&NARRATIVE_STYLES[4]),
    )
}

/// Draw every variety element uniformly at random.
pub fn create_variety_config<R: Rng>(rng: &mut R) -> VarietyConfig {
    create_variety_config_with_preference(None, rng)
}

/// Draw a variety config, favoring `preference` for the narrative style.
///
/// The preferred style is used outright 70% of the time; otherwise the style
/// is drawn uniformly and may still land on the preference.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::{NarrativeStyleKind, create_variety_config_with_preference};
///
/// let mut rng = rand::thread_rng();
/// let config = create_variety_config_with_preference(Some(NarrativeStyleKind::Reflective), &mut rng);
/// assert!(!config.opening.is_empty());
/// ```
pub fn create_variety_config_with_preference<R: Rng>(
    preference: Option<NarrativeStyleKind>,
    rng: &mut R,
) -> VarietyConfig {
    let narrative_style = match preference {
        Some(kind) if rng.gen_bool(PREFERENCE_WEIGHT) => narrative_style(kind),
        _ => style(pick(&NARRATIVE_STYLES, rng)),
    };

    VarietyConfig {
        narrative_style,
        perspective: described(*pick(&PERSPECTIVES, rng)),
        structure: described(*pick(&STRUCTURES, rng)),
        opening: pick(&OPENINGS, rng).to_string(),
        dialogue_style: named(*pick(&DIALOGUE_STYLES, rng)),
        moral_style: named(*pick(&MORAL_STYLES, rng)),
        world_building_focus: pick(&WORLD_BUILDING_FOCUS, rng).to_string(),
    }
}

/// Render the variety instruction block for the story prompt.
pub fn variety_prompt_additions(config: &VarietyConfig) -> String {
    let style = &config.narrative_style;
    let dialogue_percent = (style.dialogue_ratio * 100.0).round() as u32;

    format!(
        "\nSTORYTELLING VARIETY INSTRUCTIONS:\n\
         \n\
         NARRATIVE STYLE: {style_name}\n\
         {tone}\n\
         - Aim for approximately {dialogue_percent}% dialogue in the story\n\
         - Balance dialogue with {style_lower} elements\n\
         \n\
         NARRATIVE PERSPECTIVE: {perspective}\n\
         {perspective_instruction}\n\
         \n\
         STORY STRUCTURE: {structure}\n\
         {structure_instruction}\n\
         \n\
         OPENING STYLE:\n\
         {opening}\n\
         \n\
         DIALOGUE STYLE: {dialogue}\n\
         {dialogue_instruction}\n\
         \n\
         WORLD-BUILDING FOCUS:\n\
         {world}\n\
         - Spend time building the world and setting\n\
         - Make the environment interesting and detailed\n\
         - Show how characters interact with their world\n\
         \n\
         MORAL INTEGRATION: {moral}\n\
         {moral_instruction}\n\
         - Avoid preaching or stating lessons directly\n\
         - Let the story teach through what happens\n\
         - Focus on showing, not telling\n\
         \n\
         IMPORTANT VARIETY GUIDELINES:\n\
         - Use conversations and dialogue to show relationships and character personalities\n\
         - Build the world through descriptions and details\n\
         - Show characters doing things, not just thinking about them\n\
         - Balance action, dialogue, and description\n\
         - Make each story feel unique with its own voice and style\n\
         - Avoid repetitive patterns - vary sentence structure and pacing\n",
        style_name = style.name,
        tone = style.tone_instruction,
        style_lower = style.name.to_lowercase(),
        perspective = config.perspective.name,
        perspective_instruction = config.perspective.instruction,
        structure = config.structure.name,
        structure_instruction = config.structure.instruction,
        opening = config.opening,
        dialogue = config.dialogue_style.name,
        dialogue_instruction = config.dialogue_style.instruction,
        world = config.world_building_focus,
        moral = config.moral_style.name,
        moral_instruction = config.moral_style.instruction,
    )
}
