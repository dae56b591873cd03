//! Story prompt assembly and generation.

use crate::categorizer::StoryCategorizer;
use crate::guardrails::StoryGuardrails;
use crate::parent::{TechnicalOverrides, apply_parent_settings};
use crate::variety::variety_prompt_additions;
use lullaby_config::{LullabyConfig, OrchestrationConfig, StoryConfig};
use lullaby_core::{
    Categorization, Category, GenerateRequest, Message, ParentSettings, StoryArc,
    ValidationReport, VarietyConfig,
};
use lullaby_error::{BuilderError, LullabyResult};
use lullaby_interface::LullabyDriver;
use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

const SYSTEM_PROMPT: &str = "You are a skilled children's storyteller who creates engaging, age-appropriate bedtime stories with positive messages. You carefully follow user requests and incorporate all specified elements.";

/// One storyteller output and its validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDraft {
    /// Story text, empty when generation failed
    pub story: String,
    /// Category the draft was written for
    pub category: Category,
    /// Categorization the draft was written for
    pub categorization: Categorization,
    /// Variety choices used
    pub variety_config: VarietyConfig,
    /// Guardrail report
    pub validation: ValidationReport,
    /// Passed the guardrails
    pub is_valid: bool,
    /// Generation error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Writes stories for requests, shaped by categorization, parent settings,
/// and variety.
pub struct Storyteller<D> {
    driver: Arc<D>,
    categorizer: StoryCategorizer<D>,
    guardrails: StoryGuardrails<D>,
    story: StoryConfig,
    orchestration: OrchestrationConfig,
    parent_settings: ParentSettings,
    overrides: TechnicalOverrides,
    retry_policy: RetryPolicy,
}

impl<D: LullabyDriver> Storyteller<D> {
    /// Create a storyteller for `parent_settings`.
    pub fn new(driver: Arc<D>, config: &LullabyConfig, parent_settings: ParentSettings) -> Self {
        let overrides = apply_parent_settings(&parent_settings);
        Self {
            categorizer: StoryCategorizer::new(driver.clone()),
            guardrails: StoryGuardrails::new(driver.clone(), config),
            driver,
            story: config.story.clone(),
            orchestration: config.orchestration.clone(),
            parent_settings,
            overrides,
            retry_policy: RetryPolicy::storyteller(),
        }
    }

    /// Replace the retry policy for story generation calls.
    ///
    /// The categorizer and guardrails keep their own policies.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Parent settings this storyteller was built with.
    pub fn parent_settings(&self) -> &ParentSettings {
        &self.parent_settings
    }

    /// Overrides derived from the parent settings.
    pub fn overrides(&self) -> &TechnicalOverrides {
        &self.overrides
    }

    /// Sampling temperature for story generation.
    pub fn temperature(&self) -> f32 {
        (*self.overrides.storyteller_temperature()).unwrap_or(self.story.storyteller_temperature)
    }

    /// Story arc used in the prompt.
    pub fn story_arc(&self) -> StoryArc {
        (*self.overrides.story_arc()).unwrap_or(self.story.story_arc_type)
    }

    /// Categorize a request, or return a neutral categorization when
    /// categorization is switched off.
    pub async fn categorize_request(&self, request: &str) -> Categorization {
        if !self.orchestration.enable_categorization {
            return Categorization::disabled();
        }
        self.categorizer.categorize_and_extract(request).await
    }

    /// Build the full story prompt.
    pub fn create_story_prompt(
        &self,
        request: &str,
        categorization: &Categorization,
        revision_context: Option<&str>,
        variety: &VarietyConfig,
    ) -> String {
        let strategy = self.orchestration.strategy_for(categorization.category);
        let (min, max) = (self.story.target_age_min, self.story.target_age_max);

        let tone = if categorization.tone.is_empty() || categorization.tone == "neutral" {
            strategy.tone.as_str()
        } else {
            categorization.tone.as_str()
        };

        let mut personalization = String::new();
        if !categorization.characters.is_empty() {
            personalization.push_str(&format!(
                "\nCHARACTERS TO INCLUDE: {}\n",
                categorization.characters.join(", ")
            ));
        }
        if !categorization.theme.is_empty() {
            personalization.push_str(&format!("THEME: {}\n", categorization.theme));
        }
        if !categorization.setting.is_empty() && !categorization.setting.eq_ignore_ascii_case("any")
        {
            personalization.push_str(&format!("SETTING: {}\n", categorization.setting));
        }
        if !categorization.elements.is_empty() {
            personalization.push_str(&format!(
                "SPECIAL ELEMENTS: {}\n",
                categorization.elements.join(", ")
            ));
        }
        let parent_block = self.overrides.custom_prompts();
        if !parent_block.is_empty() {
            personalization.push_str(&format!("\nPARENT PREFERENCES:\n{parent_block}\n"));
        }

        let revision_note = revision_context
            .map(|context| {
                format!(
                    "\n\nREVISION CONTEXT:\n{context}\n\nPlease incorporate the feedback while maintaining the story's core elements."
                )
            })
            .unwrap_or_default();

        format!(
            "You are a talented children's storyteller specializing in bedtime stories for ages {min}-{max}.

{safety}

STORY REQUEST:
{request}

CATEGORY: {category}
FOCUS: {focus}
TONE: {tone}
{personalization}

{arc}

STORY REQUIREMENTS:
- Length: Approximately {words} words (engaging but not too long)
- Include: Positive themes, friendship, kindness, and a valuable lesson
- Vocabulary: {vocabulary} for ages {min}-{max}
- Sentences: {sentences} length
- Ending: Happy, uplifting, with a clear moral or lesson
- Characters: Relatable and well-developed
- IMPORTANT: Follow the story request closely. If specific characters, settings, or elements are mentioned, make sure they are central to the story.

{variety}
{revision_note}

Please write a complete, engaging bedtime story that follows these guidelines and adheres closely to the user's request. Make it unique with its own voice, style, and perspective:
",
            safety = self.guardrails.safety_prompt_addition(),
            category = categorization.category,
            focus = strategy.focus,
            arc = arc_guidance(self.story_arc()),
            words = self.story.max_story_tokens / 4,
            vocabulary = self.story.vocabulary_complexity,
            sentences = self.story.sentence_length,
            variety = variety_prompt_additions(variety),
        )
    }

    /// Generate and validate one draft.
    ///
    /// Generation failures are folded into the draft: the story is empty,
    /// `is_valid` is false, and the error is recorded.
    #[instrument(skip_all, fields(revision = revision_context.is_some(), model = self.driver.model_name()))]
    pub async fn generate_story(
        &self,
        request: &str,
        revision_context: Option<&str>,
        variety: &VarietyConfig,
    ) -> StoryDraft {
        let categorization = self.categorize_request(request).await;
        let prompt = self.create_story_prompt(request, &categorization, revision_context, variety);
        tracing::debug!(prompt_len = prompt.len(), "Built story prompt");

        match self.call_story_api(prompt).await {
            Ok(story) => {
                let validation = self.guardrails.validate_story(&story).await;
                tracing::info!(
                    category = %categorization.category,
                    story_len = story.len(),
                    is_valid = validation.is_valid,
                    "Generated story draft"
                );
                StoryDraft {
                    is_valid: validation.is_valid,
                    story,
                    category: categorization.category,
                    categorization,
                    variety_config: variety.clone(),
                    validation,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Story generation failed");
                let message = e.to_string();
                StoryDraft {
                    story: String::new(),
                    category: categorization.category,
                    categorization,
                    variety_config: variety.clone(),
                    validation: ValidationReport::failed(message.clone()),
                    is_valid: false,
                    error: Some(message),
                }
            }
        }
    }

    async fn call_story_api(&self, prompt: String) -> LullabyResult<String> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .temperature(self.temperature())
            .max_tokens(self.story.max_story_tokens)
            .timeout_secs(60u64)
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;

        let response = retry_with_backoff(self.retry_policy, || {
            self.driver.generate(&request)
        })
        .await?;
        Ok(response.text())
    }
}

fn arc_guidance(arc: StoryArc) -> &'static str {
    match arc {
        StoryArc::HeroJourney => {
            "Story Structure (Hero's Journey):
1. Beginning: Introduce character and their world
2. Call to Adventure: Something interesting happens
3. Journey: Character faces challenges and makes friends
4. Resolution: Problem is solved through kindness/bravery
5. Return: Character learns a valuable lesson"
        }
        StoryArc::ThreeAct => {
            "Story Structure (Three Act):
1. Act 1: Setup - Introduce characters and setting
2. Act 2: Confrontation - Character faces a challenge
3. Act 3: Resolution - Challenge is overcome, lesson learned"
        }
        StoryArc::SimpleAdventure => {
            "Story Structure (Simple Adventure):
1. Beginning: Introduce characters
2. Middle: An adventure or challenge occurs
3. End: Happy resolution with a lesson"
        }
    }
}
