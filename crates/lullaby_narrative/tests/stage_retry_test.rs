//! Pipeline stages riding out transient provider failures over HTTP.

use lullaby_config::LullabyConfig;
use lullaby_core::{Category, Verdict};
use lullaby_models::OpenAIClient;
use lullaby_narrative::{StoryCategorizer, StoryJudge};
use lullaby_rate_limit::RetryPolicy;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/v1/chat/completions";

fn quick_retries() -> RetryPolicy {
    RetryPolicy::new(3, 10, 1)
}

fn client_for(server: &MockServer) -> Arc<OpenAIClient> {
    Arc::new(
        OpenAIClient::with_api_key("test-key", "gpt-3.5-turbo")
            .with_base_url(format!("{}{CHAT_PATH}", server.uri())),
    )
}

fn reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn fail_first(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string("busy"))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_categorizer_recovers_from_service_unavailable() {
    let server = MockServer::start().await;
    fail_first(&server, 503, 1).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(reply(
            "CATEGORY: fantasy\nCHARACTERS: Luna\nTHEME: courage\nSETTING: a tower\nELEMENTS: stars\nTONE: calm",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let categorizer = StoryCategorizer::new(client_for(&server)).with_retry_policy(quick_retries());
    let c = categorizer.categorize_and_extract("A dragon who is afraid of the dark").await;

    assert_eq!(c.category, Category::Fantasy);
    assert_eq!(c.characters, vec!["Luna".to_string()]);
    assert_ne!(c.raw_analysis.as_deref(), Some("Fallback categorization"));
}

#[tokio::test]
async fn test_judge_recovers_from_rate_limit() {
    let server = MockServer::start().await;
    fail_first(&server, 429, 2).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(reply(
            r#"{"scores": {"overall": 8.5}, "feedback": {"what_works_well": "Warm"}, "verdict": "ACCEPT"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let judge = StoryJudge::new(client_for(&server), &LullabyConfig::default())
        .with_retry_policy(quick_retries());
    let evaluation = judge
        .evaluate_story("Luna counted the stars until she fell asleep.", "A sleepy story")
        .await;

    assert_eq!(evaluation.verdict, Verdict::Accept);
    assert_eq!(evaluation.overall_score, 8.5);
    assert!(evaluation.error.is_none());
}

#[tokio::test]
async fn test_judge_gives_up_after_policy_attempts() {
    let server = MockServer::start().await;
    fail_first(&server, 503, 3).await;

    let judge = StoryJudge::new(client_for(&server), &LullabyConfig::default())
        .with_retry_policy(quick_retries());
    let evaluation = judge.evaluate_story("A short story.", "A request").await;

    assert_eq!(evaluation.verdict, Verdict::Error);
    assert!(evaluation.error.is_some());
}

#[tokio::test]
async fn test_categorizer_does_not_retry_auth_failure() {
    let server = MockServer::start().await;
    fail_first(&server, 401, 1).await;

    let categorizer = StoryCategorizer::new(client_for(&server)).with_retry_policy(quick_retries());
    let c = categorizer.categorize_and_extract("A cat who sails the sea").await;

    assert_eq!(c.category, Category::Animals);
    assert_eq!(c.raw_analysis.as_deref(), Some("Fallback categorization"));
}
