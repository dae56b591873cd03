//! Component tests for categorizer, guardrails, judge, and storyteller.

mod common;

use common::{GOOD_STORY, MockDriver, SAFE_REPLY, Stage, auth_error, judge_reply};
use lullaby_config::LullabyConfig;
use lullaby_core::{
    Category, Interest, ParentSettings, Persona, ResponseFormat, StoryArc, Verdict,
};
use lullaby_narrative::{
    StoryCategorizer, StoryGuardrails, StoryJudge, Storyteller, create_variety_config,
};
use std::sync::Arc;

#[tokio::test]
async fn test_categorizer_request_shape() {
    let driver = Arc::new(MockDriver::new());
    let categorizer = StoryCategorizer::new(driver.clone());

    let c = categorizer.categorize_and_extract("Milo and Pip in a meadow").await;
    assert_eq!(c.category, Category::Animals);
    assert_eq!(c.setting, "A meadow");

    let request = &driver.requests(Stage::Categorizer)[0];
    assert_eq!(request.temperature, Some(0.3));
    assert_eq!(request.max_tokens, Some(300));
    assert_eq!(request.timeout_secs, Some(30));
    assert!(driver.prompt(Stage::Categorizer, 0).contains("Milo and Pip in a meadow"));
}

#[tokio::test]
async fn test_categorizer_falls_back_on_error() {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Categorizer, Err(auth_error())));
    let categorizer = StoryCategorizer::new(driver.clone());

    let c = categorizer
        .categorize_and_extract("A wizard in a tall castle")
        .await;
    assert_eq!(c.category, Category::Fantasy);
    assert_eq!(c.raw_analysis.as_deref(), Some("Fallback categorization"));
    assert_eq!(driver.calls(Stage::Categorizer), 1);
}

#[tokio::test]
async fn test_guardrails_use_model_verdict() {
    let driver = Arc::new(MockDriver::new().with_default(
        Stage::Guardrails,
        Ok(r#"{"is_safe": false, "violations": ["A chase scene"], "concerns": ["Dark forest"]}"#.to_string()),
    ));
    let guardrails = StoryGuardrails::new(driver.clone(), &LullabyConfig::default());

    let report = guardrails.validate_story(GOOD_STORY).await;
    assert!(!report.is_safe);
    assert!(report.is_age_appropriate);
    assert_eq!(report.safety_violations, vec!["A chase scene", "Dark forest"]);
    assert_eq!(report.all_issues, vec!["A chase scene", "Dark forest"]);

    let request = &driver.requests(Stage::Guardrails)[0];
    assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
    assert_eq!(request.temperature, Some(0.1));
    assert_eq!(request.timeout_secs, Some(20));
}

#[tokio::test]
async fn test_guardrails_truncate_story_for_model() {
    let driver = Arc::new(MockDriver::new());
    let guardrails = StoryGuardrails::new(driver.clone(), &LullabyConfig::default());

    let long_story = format!("{}{}", "a".repeat(2000), "TAIL_MARKER");
    let (safe, _) = guardrails.check_content_safety(&long_story).await;
    assert!(safe);
    assert!(!driver.prompt(Stage::Guardrails, 0).contains("TAIL_MARKER"));
}

#[tokio::test]
async fn test_guardrails_fall_back_to_keywords() {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Guardrails, Ok("not json".to_string())));
    let guardrails = StoryGuardrails::new(driver.clone(), &LullabyConfig::default());

    let (safe, violations) = guardrails
        .check_content_safety("The bear found a knife.")
        .await;
    assert!(!safe);
    assert_eq!(violations, vec!["Contains dangerous content: 'knife'"]);

    assert!(guardrails.check_content_safety(GOOD_STORY).await.0);
}

#[tokio::test]
async fn test_guardrails_switches() {
    let driver = Arc::new(MockDriver::new());
    let mut config = LullabyConfig::default();
    config.guardrails.enable_content_filter = false;
    config.guardrails.enable_age_check = false;
    let guardrails = StoryGuardrails::new(driver.clone(), &config);

    let report = guardrails.validate_story("").await;
    assert!(report.is_valid);
    assert_eq!(driver.calls(Stage::Guardrails), 0);

    let mut config = LullabyConfig::default();
    config.guardrails.use_llm_guardrails = false;
    let guardrails = StoryGuardrails::new(driver.clone(), &config);
    assert_eq!(
        guardrails.check_content_safety("  ").await,
        (false, vec!["Empty story".to_string()])
    );
    assert!(guardrails.check_content_safety(GOOD_STORY).await.0);
    assert_eq!(driver.calls(Stage::Guardrails), 0);
}

#[tokio::test]
async fn test_safety_prompt_renders_config() {
    let driver = Arc::new(MockDriver::new());
    let mut config = LullabyConfig::default();
    config.story.target_age_min = 4;
    config.story.target_age_max = 7;
    let guardrails = StoryGuardrails::new(driver, &config);

    let block = guardrails.safety_prompt_addition();
    assert!(block.contains("Children aged 4-7 years"));
    assert!(block.contains(
        "PROHIBITED: Violence, fear, scary monsters, dangerous situations, inappropriate language"
    ));
    assert!(block.contains("REQUIRED: Positive resolution, kindness, friendship, learning experiences"));
}

#[tokio::test]
async fn test_judge_scores_and_request_shape() {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Judge, Ok(judge_reply(7.0))));
    let mut config = LullabyConfig::default();
    config.judge.strictness_level = 9;
    let judge = StoryJudge::new(driver.clone(), &config);

    let eval = judge.evaluate_story(GOOD_STORY, "A rabbit").await;
    assert_eq!(eval.verdict, Verdict::Accept);
    assert_eq!(eval.overall_score, 7.0);
    assert!(eval.meets_threshold);
    assert!(eval.detailed_feedback.contains("- moral_value: 7.0/10"));
    assert!(eval.raw_response.is_some());

    let request = &driver.requests(Stage::Judge)[0];
    assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
    assert_eq!(request.temperature, Some(0.3));
    assert_eq!(request.max_tokens, Some(800));
    let prompt = driver.prompt(Stage::Judge, 0);
    assert!(prompt.contains("STRICTNESS LEVEL: 9/10."));
    assert!(prompt.contains("- Moral value"));
}

#[tokio::test]
async fn test_judge_empty_story_and_errors() {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Judge, Err(auth_error())));
    let judge = StoryJudge::new(driver.clone(), &LullabyConfig::default());

    let empty = judge.evaluate_story(" ", "A rabbit").await;
    assert_eq!(empty.verdict, Verdict::Error);
    assert_eq!(empty.error.as_deref(), Some("Empty story"));
    assert_eq!(driver.calls(Stage::Judge), 0);

    let failed = judge.evaluate_story(GOOD_STORY, "A rabbit").await;
    assert_eq!(failed.verdict, Verdict::Error);
    assert_eq!(failed.overall_score, 0.0);
    assert!(failed.detailed_feedback.starts_with("Error during evaluation:"));
    assert!(failed.error.unwrap().contains("Invalid API key"));
}

#[tokio::test]
async fn test_revision_prompt_includes_everything() {
    let driver = Arc::new(MockDriver::new());
    let judge = StoryJudge::new(driver, &LullabyConfig::default());

    let prompt = judge.generate_revision_prompt("Old story", "Needs more dialogue", "A rabbit");
    assert!(prompt.contains("ORIGINAL USER REQUEST:\nA rabbit"));
    assert!(prompt.contains("ORIGINAL STORY:\nOld story"));
    assert!(prompt.contains("JUDGE'S FEEDBACK:\nNeeds more dialogue"));
    assert!(prompt.contains("Appropriate for children aged 5-10"));
    assert!(prompt.trim_end().ends_with("REVISED STORY:"));
}

#[tokio::test]
async fn test_story_prompt_blocks() {
    let driver = Arc::new(MockDriver::new());
    let settings = ParentSettings {
        persona: Persona::GentleFriend,
        interests: vec![Interest::Music],
        child_name: Some("Nora".to_string()),
        ..ParentSettings::default()
    };
    let storyteller = Storyteller::new(driver.clone(), &LullabyConfig::default(), settings);
    assert_eq!(storyteller.temperature(), 0.7);
    assert_eq!(storyteller.story_arc(), StoryArc::ThreeAct);

    let categorization = storyteller.categorize_request("Milo and Pip").await;
    let variety = create_variety_config(&mut rand::thread_rng());
    let prompt = storyteller.create_story_prompt("Milo and Pip", &categorization, None, &variety);

    assert!(prompt.starts_with(
        "You are a talented children's storyteller specializing in bedtime stories for ages 5-10."
    ));
    assert!(prompt.contains("STORY REQUEST:\nMilo and Pip"));
    assert!(prompt.contains("CATEGORY: animals"));
    assert!(prompt.contains("FOCUS: animal characters learning valuable lessons"));
    assert!(prompt.contains("TONE: playful and gentle"));
    assert!(prompt.contains("CHARACTERS TO INCLUDE: Milo, Pip"));
    assert!(prompt.contains("SETTING: A meadow"));
    assert!(prompt.contains("SPECIAL ELEMENTS: the moon"));
    assert!(prompt.contains("PARENT PREFERENCES:"));
    assert!(prompt.contains("Nora"));
    assert!(prompt.contains("Story Structure (Three Act):"));
    assert!(prompt.contains("Approximately 375 words"));
    assert!(!prompt.contains("REVISION CONTEXT"));
}

#[tokio::test]
async fn test_default_persona_uses_configured_temperature() {
    let driver = Arc::new(MockDriver::new());
    let mut config = LullabyConfig::default();
    config.story.storyteller_temperature = 0.55;
    config.story.story_arc_type = StoryArc::SimpleAdventure;
    let storyteller = Storyteller::new(driver.clone(), &config, ParentSettings::default());

    let variety = create_variety_config(&mut rand::thread_rng());
    let draft = storyteller.generate_story("A rabbit", None, &variety).await;
    assert!(draft.is_valid);

    let request = &driver.requests(Stage::Storyteller)[0];
    assert_eq!(request.temperature, Some(0.55));
    assert_eq!(request.max_tokens, Some(1500));
    assert_eq!(request.timeout_secs, Some(60));
    assert!(driver
        .prompt(Stage::Storyteller, 0)
        .contains("Story Structure (Simple Adventure):"));
}

#[tokio::test]
async fn test_categorization_disabled_skips_model() {
    let driver = Arc::new(MockDriver::new());
    let mut config = LullabyConfig::default();
    config.orchestration.enable_categorization = false;
    let storyteller = Storyteller::new(driver.clone(), &config, ParentSettings::default());

    let c = storyteller.categorize_request("A dragon").await;
    assert_eq!(c.category, Category::Default);
    assert_eq!(driver.calls(Stage::Categorizer), 0);

    let variety = create_variety_config(&mut rand::thread_rng());
    let prompt = storyteller.create_story_prompt("A dragon", &c, Some("Be brief"), &variety);
    assert!(prompt.contains("TONE: uplifting"));
    assert!(prompt.contains("REVISION CONTEXT:\nBe brief"));
}

#[tokio::test]
async fn test_draft_records_generation_error() {
    let driver = Arc::new(MockDriver::new().with_default(Stage::Storyteller, Err(auth_error())));
    let storyteller = Storyteller::new(driver.clone(), &LullabyConfig::default(), ParentSettings::default());

    let variety = create_variety_config(&mut rand::thread_rng());
    let draft = storyteller.generate_story("A rabbit", None, &variety).await;
    assert!(draft.story.is_empty());
    assert!(!draft.is_valid);
    assert!(draft.error.is_some());
    assert!(draft.validation.error.is_some());
    assert_eq!(draft.category, Category::Animals);
    assert_eq!(driver.calls(Stage::Guardrails), 0);
}

#[tokio::test]
async fn test_safe_reply_constant_parses() {
    let value: serde_json::Value = serde_json::from_str(SAFE_REPLY).unwrap();
    assert_eq!(value["is_safe"], true);
}
