//! End-to-end pipeline tests against a scripted driver.

mod common;

use common::{
    FLAT_STORY, GOOD_STORY, MemoryRepository, MockDriver, Stage, auth_error, judge_reply,
};
use lullaby_config::LullabyConfig;
use lullaby_core::{Category, ParentSettings};
use lullaby_narrative::{SAFETY_REVISION_CONTEXT, StoryOrchestrator, variety_prompt_additions};
use std::sync::Arc;

fn revision(n: usize) -> String {
    format!("{GOOD_STORY} Revision number {n}.")
}

fn orchestrator(driver: &Arc<MockDriver>, config: &LullabyConfig) -> StoryOrchestrator<MockDriver> {
    StoryOrchestrator::new(driver.clone(), config, ParentSettings::default()).unwrap()
}

#[tokio::test]
async fn test_first_draft_accepted() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new());
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit and his friend look at the moon")
        .await?;

    assert_eq!(outcome.story, GOOD_STORY);
    assert_eq!(outcome.revision_count, 0);
    assert_eq!(outcome.judge_score, 8.0);
    assert!(outcome.is_valid);
    assert!(outcome.meets_quality_threshold);
    assert_eq!(outcome.category, Category::Animals);
    assert_eq!(outcome.categorization.characters, vec!["Milo", "Pip"]);
    assert_eq!(outcome.story_id, None);
    assert!(!outcome.user_feedback_applied);

    assert_eq!(driver.calls(Stage::Categorizer), 1);
    assert_eq!(driver.calls(Stage::Storyteller), 1);
    // One loop evaluation plus the final one.
    assert_eq!(driver.calls(Stage::Judge), 2);
    // Draft validation plus final validation.
    assert_eq!(driver.calls(Stage::Guardrails), 2);
    Ok(())
}

#[tokio::test]
async fn test_invalid_request_makes_no_calls() {
    let driver = Arc::new(MockDriver::new());
    let config = LullabyConfig::default();

    let err = orchestrator(&driver, &config)
        .generate_story_with_judge("   ")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Input cannot be empty or only whitespace"));
    assert_eq!(driver.calls(Stage::Categorizer), 0);
    assert_eq!(driver.calls(Stage::Storyteller), 0);
}

#[tokio::test]
async fn test_revisions_stop_one_short_of_max() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new()
            .with_default(Stage::Judge, Ok(judge_reply(5.0)))
            .with_script(
                Stage::Storyteller,
                vec![Ok(GOOD_STORY.to_string()), Ok(revision(1)), Ok(revision(2))],
            ),
    );
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit and his friend")
        .await?;

    assert_eq!(outcome.revision_count, 2);
    assert_eq!(outcome.story, revision(2));
    assert_eq!(outcome.judge_score, 5.0);
    assert!(!outcome.meets_quality_threshold);
    assert_eq!(driver.calls(Stage::Storyteller), 3);
    assert_eq!(driver.calls(Stage::Judge), 4);

    let revision_prompt = driver.prompt(Stage::Storyteller, 1);
    assert!(revision_prompt.contains("REVISION CONTEXT:"));
    assert!(revision_prompt.contains("JUDGE'S FEEDBACK:"));
    assert!(revision_prompt.contains("Suggestions for Improvement: More dialogue"));
    assert!(revision_prompt.contains(&variety_prompt_additions(&outcome.variety_config)));
    Ok(())
}

#[tokio::test]
async fn test_invalid_first_draft_is_regenerated_with_same_variety() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().with_script(
        Stage::Storyteller,
        vec![Ok(FLAT_STORY.to_string()), Ok(GOOD_STORY.to_string())],
    ));
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A quiet hill")
        .await?;

    assert_eq!(outcome.story, GOOD_STORY);
    assert!(outcome.is_valid);
    assert_eq!(driver.calls(Stage::Storyteller), 2);

    let first = driver.prompt(Stage::Storyteller, 0);
    let retry = driver.prompt(Stage::Storyteller, 1);
    assert!(!first.contains(SAFETY_REVISION_CONTEXT));
    assert!(retry.contains(SAFETY_REVISION_CONTEXT));
    let variety = variety_prompt_additions(&outcome.variety_config);
    assert!(first.contains(&variety));
    assert!(retry.contains(&variety));
    Ok(())
}

#[tokio::test]
async fn test_invalid_revision_keeps_previous_story() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new()
            .with_default(Stage::Judge, Ok(judge_reply(5.0)))
            .with_script(
                Stage::Storyteller,
                vec![Ok(GOOD_STORY.to_string()), Ok(FLAT_STORY.to_string())],
            ),
    );
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit and his friend")
        .await?;

    assert_eq!(outcome.story, GOOD_STORY);
    assert_eq!(outcome.revision_count, 0);
    assert_eq!(driver.calls(Stage::Judge), 2);
    Ok(())
}

#[tokio::test]
async fn test_refinement_disabled_judges_once() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Judge, Ok(judge_reply(3.0))));
    let mut config = LullabyConfig::default();
    config.orchestration.enable_iterative_refinement = false;

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit")
        .await?;

    assert_eq!(outcome.revision_count, 0);
    assert_eq!(outcome.judge_score, 3.0);
    assert_eq!(driver.calls(Stage::Judge), 1);
    assert_eq!(driver.calls(Stage::Storyteller), 1);
    Ok(())
}

#[tokio::test]
async fn test_single_attempt_never_revises() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Judge, Ok(judge_reply(4.0))));
    let mut config = LullabyConfig::default();
    config.judge.max_revision_attempts = 1;

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit")
        .await?;

    assert_eq!(outcome.revision_count, 0);
    assert_eq!(driver.calls(Stage::Storyteller), 1);
    assert_eq!(driver.calls(Stage::Judge), 2);
    Ok(())
}

#[tokio::test]
async fn test_judge_failure_degrades_to_zero_score() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Judge, Err(auth_error())));
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit")
        .await?;

    assert_eq!(outcome.judge_score, 0.0);
    assert!(!outcome.meets_quality_threshold);
    assert!(outcome.judge_feedback.starts_with("Error during evaluation:"));
    assert_eq!(outcome.revision_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_story_is_saved() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new());
    let config = LullabyConfig::default();
    let repo = MemoryRepository::default();
    let saved = repo.saved.clone();

    let outcome = orchestrator(&driver, &config)
        .with_storage(Box::new(repo))
        .generate_story_with_judge("A rabbit")
        .await?;

    assert_eq!(outcome.story_id, Some(1));
    let saved = saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].story, GOOD_STORY);
    Ok(())
}

#[tokio::test]
async fn test_storage_failure_is_not_fatal() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new());
    let config = LullabyConfig::default();

    let outcome = orchestrator(&driver, &config)
        .with_storage(Box::new(MemoryRepository::failing()))
        .generate_story_with_judge("A rabbit")
        .await?;

    assert_eq!(outcome.story_id, None);
    assert_eq!(outcome.story, GOOD_STORY);
    Ok(())
}

#[tokio::test]
async fn test_user_feedback_replaces_story_and_saves_again() -> anyhow::Result<()> {
    let feedback_story = format!("{GOOD_STORY} A friendly dragon waved goodnight.");
    let driver = Arc::new(MockDriver::new().with_script(
        Stage::Storyteller,
        vec![Ok(GOOD_STORY.to_string()), Ok(feedback_story.clone())],
    ));
    let config = LullabyConfig::default();
    let repo = MemoryRepository::default();
    let saved = repo.saved.clone();
    let orchestrator = orchestrator(&driver, &config).with_storage(Box::new(repo));
    assert!(orchestrator.user_feedback_enabled());

    let outcome = orchestrator.generate_story_with_judge("A rabbit").await?;
    let variety = outcome.variety_config.clone();
    let revised = orchestrator.apply_user_feedback(outcome, "add a dragon").await?;

    assert_eq!(revised.story, feedback_story);
    assert!(revised.user_feedback_applied);
    assert_eq!(revised.user_requested_changes.as_deref(), Some("add a dragon"));
    assert_eq!(revised.variety_config, variety);
    assert_eq!(revised.story_id, Some(2));
    assert_eq!(saved.lock().unwrap().len(), 2);

    let prompt = driver.prompt(Stage::Storyteller, 1);
    assert!(prompt.contains("A rabbit. Please incorporate: add a dragon"));
    assert!(prompt.contains("User requested changes: add a dragon"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_user_feedback_keeps_outcome() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().with_script(
        Stage::Storyteller,
        vec![Ok(GOOD_STORY.to_string()), Ok(FLAT_STORY.to_string())],
    ));
    let config = LullabyConfig::default();
    let orchestrator = orchestrator(&driver, &config);

    let outcome = orchestrator.generate_story_with_judge("A rabbit").await?;
    let revised = orchestrator
        .apply_user_feedback(outcome.clone(), "make it about rocks")
        .await?;

    assert_eq!(revised, outcome);
    Ok(())
}

#[tokio::test]
async fn test_invalid_parent_settings_rejected() {
    let driver = Arc::new(MockDriver::new());
    let settings = ParentSettings {
        child_name: Some("n".repeat(101)),
        ..ParentSettings::default()
    };
    let result = StoryOrchestrator::new(driver, &LullabyConfig::default(), settings);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_failed_generation_yields_empty_invalid_story() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new().with_default(Stage::Storyteller, Err(auth_error())),
    );
    let mut config = LullabyConfig::default();
    config.orchestration.enable_iterative_refinement = false;

    let outcome = orchestrator(&driver, &config)
        .generate_story_with_judge("A rabbit")
        .await?;

    assert!(outcome.story.is_empty());
    assert!(!outcome.is_valid);
    assert_eq!(outcome.validation.safety_violations, vec!["Empty story"]);
    assert_eq!(outcome.judge_feedback, "Empty story provided for evaluation");
    // The judge is never called for an empty story.
    assert_eq!(driver.calls(Stage::Judge), 0);
    assert_eq!(driver.calls(Stage::Guardrails), 0);
    Ok(())
}
