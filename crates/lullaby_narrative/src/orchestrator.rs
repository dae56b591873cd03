//! End-to-end story generation with judging and revision.

use crate::guardrails::StoryGuardrails;
use crate::judge::StoryJudge;
use crate::storyteller::{StoryDraft, Storyteller};
use crate::validation::{validate_parent_settings, validate_user_input};
use crate::variety::create_variety_config_with_preference;
use lullaby_config::LullabyConfig;
use lullaby_core::{ParentSettings, StoryOutcome, VarietyConfig};
use lullaby_error::LullabyResult;
use lullaby_interface::{LullabyDriver, StoryRepository};
use std::sync::Arc;
use tracing::instrument;

/// Revision context used when the first draft fails the guardrails.
pub const SAFETY_REVISION_CONTEXT: &str =
    "Please ensure the story passes all safety and age-appropriateness checks.";

/// Runs the generate, judge, and revise loop and saves the result.
///
/// # Example
///
/// ```rust,ignore
/// let orchestrator = StoryOrchestrator::new(driver, &config, ParentSettings::default())?
///     .with_storage(Box::new(repository));
/// let outcome = orchestrator.generate_story_with_judge("A bunny who is afraid of the dark").await?;
/// if let Some(id) = outcome.story_id {
///     println!("saved as #{id}");
/// }
/// ```
pub struct StoryOrchestrator<D> {
    storyteller: Storyteller<D>,
    judge: StoryJudge<D>,
    guardrails: StoryGuardrails<D>,
    enable_iterative_refinement: bool,
    enable_user_feedback: bool,
    max_revisions: u32,
    storage: Option<Box<dyn StoryRepository>>,
}

impl<D: LullabyDriver> StoryOrchestrator<D> {
    /// Create an orchestrator with no storage attached.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent_settings` fail validation.
    pub fn new(
        driver: Arc<D>,
        config: &LullabyConfig,
        parent_settings: ParentSettings,
    ) -> LullabyResult<Self> {
        validate_parent_settings(&parent_settings)?;
        Ok(Self {
            storyteller: Storyteller::new(driver.clone(), config, parent_settings),
            judge: StoryJudge::new(driver.clone(), config),
            guardrails: StoryGuardrails::new(driver, config),
            enable_iterative_refinement: config.orchestration.enable_iterative_refinement,
            enable_user_feedback: config.orchestration.enable_user_feedback,
            max_revisions: config.judge.max_revision_attempts,
            storage: None,
        })
    }

    /// Save finished stories to `storage`.
    pub fn with_storage(mut self, storage: Box<dyn StoryRepository>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Whether callers should offer a change request after generation.
    pub fn user_feedback_enabled(&self) -> bool {
        self.enable_user_feedback
    }

    /// The storyteller, for prompt inspection.
    pub fn storyteller(&self) -> &Storyteller<D> {
        &self.storyteller
    }

    /// Generate a story, judge it, revise it up to the configured bound,
    /// and save it when storage is attached.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid request. Model failures degrade
    /// into low scores or fallbacks, and storage failures are logged.
    #[instrument(skip_all, fields(request_len = request.len(), max_revisions = self.max_revisions))]
    pub async fn generate_story_with_judge(&self, request: &str) -> LullabyResult<StoryOutcome> {
        validate_user_input(request)?;
        tracing::info!("Starting story generation");

        let preference = *self.storyteller.overrides().narrative_style_preference();
        let variety =
            create_variety_config_with_preference(Some(preference), &mut rand::thread_rng());

        let mut accepted = self.storyteller.generate_story(request, None, &variety).await;
        if !accepted.is_valid {
            tracing::warn!(issues = ?accepted.validation.all_issues, "Initial story failed guardrails, regenerating");
            accepted = self
                .storyteller
                .generate_story(request, Some(SAFETY_REVISION_CONTEXT), &variety)
                .await;
        }

        let revision_count = if self.enable_iterative_refinement {
            self.refine(request, &variety, &mut accepted).await
        } else {
            0
        };

        let outcome = self
            .finalize(request, accepted, variety, revision_count)
            .await;
        Ok(self.persist(outcome).await)
    }

    async fn refine(&self, request: &str, variety: &VarietyConfig, accepted: &mut StoryDraft) -> u32 {
        let mut revision_count = 0;

        while revision_count < self.max_revisions {
            tracing::info!(attempt = revision_count + 1, "Evaluating story");
            let evaluation = self.judge.evaluate_story(&accepted.story, request).await;

            if evaluation.meets_threshold {
                tracing::info!(score = evaluation.overall_score, "Story approved by judge");
                break;
            }
            if revision_count + 1 >= self.max_revisions {
                tracing::warn!("Maximum revisions reached, keeping current story");
                break;
            }

            let revision_prompt = self.judge.generate_revision_prompt(
                &accepted.story,
                &evaluation.detailed_feedback,
                request,
            );
            let revised = self
                .storyteller
                .generate_story(request, Some(&revision_prompt), variety)
                .await;

            if revised.is_valid {
                *accepted = revised;
                revision_count += 1;
                tracing::info!(revision_count, "Accepted revision");
            } else {
                tracing::warn!("Revised story failed guardrails, keeping previous version");
                break;
            }
        }

        revision_count
    }

    async fn finalize(
        &self,
        request: &str,
        draft: StoryDraft,
        variety: VarietyConfig,
        revision_count: u32,
    ) -> StoryOutcome {
        let validation = self.guardrails.validate_story(&draft.story).await;
        let evaluation = self.judge.evaluate_story(&draft.story, request).await;

        tracing::info!(
            score = evaluation.overall_score,
            is_valid = validation.is_valid,
            revision_count,
            "Story complete"
        );

        StoryOutcome {
            story: draft.story,
            user_request: request.to_string(),
            category: draft.category,
            categorization: draft.categorization,
            variety_config: variety,
            revision_count,
            judge_score: evaluation.overall_score,
            judge_feedback: evaluation.detailed_feedback,
            is_valid: validation.is_valid,
            validation,
            meets_quality_threshold: evaluation.meets_threshold,
            parent_settings: self.storyteller.parent_settings().clone(),
            story_id: None,
            user_feedback_applied: false,
            user_requested_changes: None,
        }
    }

    async fn persist(&self, mut outcome: StoryOutcome) -> StoryOutcome {
        if let Some(storage) = &self.storage {
            match storage.save_story(&outcome).await {
                Ok(id) => {
                    tracing::info!(story_id = id, "Story saved");
                    outcome.story_id = Some(id);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not save story to database");
                    outcome.story_id = None;
                }
            }
        }
        outcome
    }

    /// Rewrite a finished story with the user's requested changes.
    ///
    /// The rewrite keeps the outcome's variety config. When it passes the
    /// guardrails it replaces the story and, with storage attached, is saved
    /// as a new record; otherwise the outcome is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined request fails input validation.
    #[instrument(skip_all, fields(changes_len = changes.len()))]
    pub async fn apply_user_feedback(
        &self,
        mut outcome: StoryOutcome,
        changes: &str,
    ) -> LullabyResult<StoryOutcome> {
        let request = format!("{}. Please incorporate: {changes}", outcome.user_request);
        validate_user_input(&request)?;
        let context = format!("User requested changes: {changes}");

        let revised = self
            .storyteller
            .generate_story(&request, Some(&context), &outcome.variety_config)
            .await;

        if !revised.is_valid {
            tracing::warn!("Requested changes failed guardrails, keeping original story");
            return Ok(outcome);
        }

        outcome.story = revised.story;
        outcome.user_feedback_applied = true;
        outcome.user_requested_changes = Some(changes.to_string());
        if self.storage.is_some() {
            outcome.story_id = None;
            outcome = self.persist(outcome).await;
        }
        Ok(outcome)
    }
}
