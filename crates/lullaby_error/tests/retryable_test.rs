use lullaby_error::{
    ConfigError, JsonError, LlmError, LlmErrorKind, LullabyError, RetryableError, StoryError,
    StoryErrorKind,
};

fn http(status_code: u16) -> LullabyError {
    LlmError::new(LlmErrorKind::Http {
        status_code,
        message: "upstream".to_string(),
    })
    .into()
}

#[test]
fn transient_provider_failures_are_retryable() {
    for status in [408, 429, 500, 502, 503, 504] {
        assert!(http(status).is_retryable(), "status {status}");
    }
    let timeout: LullabyError = LlmError::new(LlmErrorKind::Timeout(30)).into();
    let refused: LullabyError = LlmError::new(LlmErrorKind::Connection("refused".into())).into();
    assert!(timeout.is_retryable());
    assert!(refused.is_retryable());
}

#[test]
fn client_and_pipeline_failures_are_permanent() {
    for status in [400, 401, 403, 404] {
        assert!(!http(status).is_retryable(), "status {status}");
    }
    let missing: LullabyError = LlmError::new(LlmErrorKind::MissingApiKey("KEY".into())).into();
    let json: LullabyError = JsonError::new("bad body").into();
    let config: LullabyError = ConfigError::new("bad range").into();
    let story: LullabyError = StoryError::new(StoryErrorKind::InvalidInput("empty".into())).into();

    assert!(!missing.is_retryable());
    assert!(!json.is_retryable());
    assert!(!config.is_retryable());
    assert!(!story.is_retryable());
}
