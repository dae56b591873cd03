//! OpenAI client tests against a local mock server.

use lullaby_core::{GenerateRequest, Message, ResponseFormat};
use lullaby_error::{LlmErrorKind, LullabyError, LullabyErrorKind, RetryableError};
use lullaby_interface::LullabyDriver;
use lullaby_models::{ChatCompletionRequest, OpenAIClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAIClient {
    OpenAIClient::with_api_key("test-key", "gpt-3.5-turbo")
        .with_base_url(format!("{}/v1/chat/completions", server.uri()))
}

fn story_request() -> GenerateRequest {
    GenerateRequest::builder()
        .messages(vec![
            Message::system("You are a skilled children's storyteller."),
            Message::user("A story about a sleepy owl"),
        ])
        .temperature(0.8f32)
        .max_tokens(1500u32)
        .build()
        .unwrap()
}

fn llm_kind(err: &LullabyError) -> &LlmErrorKind {
    match err.kind() {
        LullabyErrorKind::Llm(e) => &e.kind,
        other => panic!("expected LLM error, got {other}"),
    }
}

#[test]
fn wire_request_omits_unset_options() {
    let req = GenerateRequest::builder()
        .messages(vec![Message::user("hi")])
        .build()
        .unwrap();
    let body = serde_json::to_value(ChatCompletionRequest::from_generate(&req, "gpt-4o")).unwrap();

    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][0]["role"], "user");
    assert!(body.get("temperature").is_none());
    assert!(body.get("response_format").is_none());
}

#[tokio::test]
async fn returns_first_choice_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 1500,
            "messages": [{"role": "system"}, {"role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Once upon a time, an owl yawned."},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).generate(&story_request()).await.unwrap();
    assert_eq!(response.text(), "Once upon a time, an owl yawned.");
}

#[tokio::test]
async fn json_mode_is_sent_as_response_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"is_safe\": true}"}}]
        })))
        .mount(&server)
        .await;

    let request = GenerateRequest::builder()
        .messages(vec![Message::user("check")])
        .response_format(ResponseFormat::JsonObject)
        .build()
        .unwrap();
    let response = client_for(&server).generate(&request).await.unwrap();
    assert_eq!(response.text(), "{\"is_safe\": true}");
}

#[tokio::test]
async fn non_success_status_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&story_request()).await.unwrap_err();
    assert!(err.is_retryable());
    match llm_kind(&err) {
        LlmErrorKind::Http {
            status_code,
            message,
        } => {
            assert_eq!(*status_code, 429);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("unexpected kind {other}"),
    }
}

#[tokio::test]
async fn auth_failure_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&story_request()).await.unwrap_err();
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn empty_choices_are_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&story_request()).await.unwrap_err();
    assert_eq!(llm_kind(&err), &LlmErrorKind::EmptyResponse);
}

#[tokio::test]
async fn malformed_body_is_a_parsing_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&story_request()).await.unwrap_err();
    assert!(matches!(llm_kind(&err), LlmErrorKind::ResponseParsing(_)));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_json(json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hi")])
        .timeout_secs(1u64)
        .build()
        .unwrap();
    let err = client_for(&server).generate(&request).await.unwrap_err();
    assert_eq!(llm_kind(&err), &LlmErrorKind::Timeout(1));
    assert!(err.is_retryable());
}

#[test]
fn debug_output_hides_key() {
    let client = OpenAIClient::with_api_key("sk-secret", "gpt-3.5-turbo");
    let debug = format!("{client:?}");
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("gpt-3.5-turbo"));
}
