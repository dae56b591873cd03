//! Shared fixtures for database tests.

#![allow(dead_code)]

use lullaby_core::{
    Categorization, Category, DescribedStyle, NamedStyle, NarrativeStyle, ParentSettings,
    StoryOutcome, ValidationReport, VarietyConfig,
};

pub fn variety() -> VarietyConfig {
    VarietyConfig {
        narrative_style: NarrativeStyle {
            name: "Balanced".to_string(),
            description: "Mix of dialogue, description, and action".to_string(),
            dialogue_ratio: 0.4,
            tone_instruction: "Balance dialogue, description, and action.".to_string(),
            opening_style: "Begin in a way that fits the story".to_string(),
        },
        perspective: DescribedStyle {
            name: "Third Person Limited".to_string(),
            description: "Follow one character closely".to_string(),
            instruction: "Follow the main character closely.".to_string(),
        },
        structure: DescribedStyle {
            name: "Linear".to_string(),
            description: "Chronological order".to_string(),
            instruction: "Tell events in order.".to_string(),
        },
        opening: "Start with a question".to_string(),
        dialogue_style: NamedStyle {
            name: "Natural".to_string(),
            instruction: "Characters speak naturally.".to_string(),
        },
        moral_style: NamedStyle {
            name: "Show, Don't Tell".to_string(),
            instruction: "Show the moral through actions.".to_string(),
        },
        world_building_focus: "Sensory details".to_string(),
    }
}

pub fn outcome(story: &str, request: &str, category: Category, score: f64) -> StoryOutcome {
    StoryOutcome {
        story: story.to_string(),
        user_request: request.to_string(),
        category,
        categorization: Categorization::fallback(category),
        variety_config: variety(),
        revision_count: 1,
        judge_score: score,
        judge_feedback: format!("Overall Score: {score}/10"),
        validation: ValidationReport::from_checks((true, vec![]), (true, vec![])),
        is_valid: true,
        meets_quality_threshold: score >= 7.0,
        parent_settings: ParentSettings::default(),
        story_id: None,
        user_feedback_applied: false,
        user_requested_changes: None,
    }
}
