//! End-to-end pipeline through the facade, saving to a real SQLite file.

#![cfg(feature = "database")]

use async_trait::async_trait;
use lullaby::{
    Category, GenerateRequest, GenerateResponse, LullabyConfig, LullabyDriver, LullabyResult,
    ParentSettingsInput, SqliteStoryRepository, StoryOrchestrator, StoryRepository,
    establish_connection, get_story, parse_parent_settings, story_statistics,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const STORY: &str = "Pip the kind fox loved to help her friend Moss the turtle. \
They would laugh and smile as they shared berries under the stars. \
When Moss felt slow, Pip waited with joy, and both felt happy and safe.";

/// Answers every stage with a fixed reply; the judge score rises per call.
struct ScriptedDriver {
    judge_calls: AtomicUsize,
}

#[async_trait]
impl LullabyDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> LullabyResult<GenerateResponse> {
        let system = req
            .messages
            .first()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let reply = if system.contains("expert at understanding") {
            "CATEGORY: animals\nCHARACTERS: Pip, Moss\nTHEME: patience\nSETTING: a forest\nELEMENTS: none\nTONE: gentle".to_string()
        } else if system.contains("content safety expert") {
            r#"{"is_safe": true, "violations": [], "concerns": []}"#.to_string()
        } else if system.contains("children's story evaluator") {
            let n = self.judge_calls.fetch_add(1, Ordering::SeqCst);
            let score = if n == 0 { 6.0 } else { 8.5 };
            format!(
                r#"{{"scores": {{"overall": {score}}}, "feedback": {{"what_works_well": "Warm", "suggestions_for_improvement": "Slower ending"}}, "verdict": "REVISE"}}"#
            )
        } else {
            STORY.to_string()
        };
        Ok(GenerateResponse::from_text(reply))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

#[tokio::test]
async fn test_story_is_revised_saved_and_readable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("history").join("stories.db");

    let settings = parse_parent_settings(&ParentSettingsInput {
        persona: Some("gentle_friend".to_string()),
        values: vec!["patience".to_string()],
        child_name: Some("Ada".to_string()),
        ..ParentSettingsInput::default()
    })?;

    let driver = Arc::new(ScriptedDriver {
        judge_calls: AtomicUsize::new(0),
    });
    let repository = SqliteStoryRepository::open(&db_path)?;
    let orchestrator = StoryOrchestrator::new(driver, &LullabyConfig::default(), settings)?
        .with_storage(Box::new(repository.clone()));

    let outcome = orchestrator
        .generate_story_with_judge("A fox and a turtle learn patience")
        .await?;

    assert_eq!(outcome.category, Category::Animals);
    assert_eq!(outcome.revision_count, 1);
    assert_eq!(outcome.judge_score, 8.5);
    assert!(outcome.meets_quality_threshold);
    let id = outcome.story_id.expect("story should be saved");

    let via_trait = repository.get_story(id).await?.expect("row exists");
    assert_eq!(via_trait.story_text, STORY);
    assert_eq!(via_trait.parent_settings.child_name.as_deref(), Some("Ada"));
    assert_eq!(via_trait.variety_config.as_ref(), Some(&outcome.variety_config));

    let mut conn = establish_connection(&db_path)?;
    let direct = get_story(&mut conn, id)?.expect("row exists");
    assert_eq!(direct.revision_count, 1);
    assert_eq!(story_statistics(&mut conn)?.total_stories, 1);
    Ok(())
}
