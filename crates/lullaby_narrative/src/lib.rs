//! Story pipeline for the Lullaby bedtime story generator.
//!
//! A story request flows through these stages:
//!
//! - **Validation** rejects empty, oversized, or script-bearing requests
//!   before any model call.
//! - [`StoryCategorizer`] classifies the request and pulls out characters,
//!   theme, setting, elements, and tone.
//! - [`Storyteller`] assembles the story prompt and generates a draft.
//! - [`StoryGuardrails`] checks the draft for safety and age fit.
//! - [`StoryJudge`] scores the draft and drives revisions.
//! - [`StoryOrchestrator`] sequences all of the above and saves the result.
//!
//! Every component is generic over a [`LullabyDriver`](lullaby_interface::LullabyDriver),
//! so tests run the whole pipeline against a scripted driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use lullaby_config::LullabyConfig;
//! use lullaby_core::ParentSettings;
//! use lullaby_models::OpenAIClient;
//! use lullaby_narrative::StoryOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LullabyConfig::load()?;
//! let client = Arc::new(OpenAIClient::from_config(&config)?);
//! let orchestrator = StoryOrchestrator::new(client, &config, ParentSettings::default())?;
//!
//! let outcome = orchestrator
//!     .generate_story_with_judge("A sleepy dragon who learns to share")
//!     .await?;
//! println!("{} ({:.1}/10)", outcome.story, outcome.judge_score);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod categorizer;
mod extraction;
mod guardrails;
mod judge;
mod orchestrator;
mod parent;
mod storyteller;
mod validation;
mod variety;

pub use categorizer::{StoryCategorizer, fallback_categorize, parse_categorization};
pub use extraction::{extract_json, parse_json, safe_parse_json};
pub use guardrails::{StoryGuardrails, keyword_content_safety_check};
pub use judge::StoryJudge;
pub use orchestrator::{SAFETY_REVISION_CONTEXT, StoryOrchestrator};
pub use parent::{
    ParentSettingsInput, PersonaProfile, TechnicalOverrides, apply_parent_settings,
    interest_phrase, parse_parent_settings, persona_profile, value_phrase,
};
pub use storyteller::{StoryDraft, Storyteller};
pub use validation::{sanitize_text, validate_parent_settings, validate_user_input};
pub use variety::{
    NarrativeStyleKind, create_variety_config, create_variety_config_with_preference,
    narrative_style, variety_prompt_additions,
};
