//! Storytelling variety selections recorded with each story.

use serde::{Deserialize, Serialize};

/// How the story balances dialogue, description, and action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeStyle {
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Target share of dialogue (0.0-1.0)
    pub dialogue_ratio: f64,
    /// Instruction given to the storyteller
    pub tone_instruction: String,
    /// Suggested way to open the story
    pub opening_style: String,
}

/// A named style with a single storyteller instruction and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedStyle {
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Instruction given to the storyteller
    pub instruction: String,
}

/// A named style with a single storyteller instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStyle {
    /// Display name
    pub name: String,
    /// Instruction given to the storyteller
    pub instruction: String,
}

/// Narrative viewpoint.
pub type Perspective = DescribedStyle;
/// Ordering of story events.
pub type StoryStructure = DescribedStyle;
/// How characters talk.
pub type DialogueStyle = NamedStyle;
/// How the moral is woven in.
pub type MoralStyle = NamedStyle;

/// Complete set of variety choices for one story.
///
/// Chosen once per story and reused across revisions so a revised story
/// keeps its voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarietyConfig {
    /// Narrative style
    pub narrative_style: NarrativeStyle,
    /// Narrative perspective
    pub perspective: Perspective,
    /// Story structure
    pub structure: StoryStructure,
    /// Opening instruction
    pub opening: String,
    /// Dialogue style
    pub dialogue_style: DialogueStyle,
    /// Moral integration style
    pub moral_style: MoralStyle,
    /// World-building emphasis
    pub world_building_focus: String,
}
