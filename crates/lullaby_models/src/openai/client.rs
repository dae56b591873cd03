//! OpenAI-compatible chat-completions client.

use super::dto::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use lullaby_config::LullabyConfig;
use lullaby_core::{GenerateRequest, GenerateResponse};
use lullaby_error::{LlmError, LlmErrorKind, LullabyResult};
use lullaby_interface::LullabyDriver;
use lullaby_rate_limit::RateLimiter;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Client for OpenAI-compatible chat-completions endpoints.
///
/// Every call waits on the client's [`RateLimiter`] first. Clones share the
/// HTTP connection pool and the limiter budget.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    limiter: RateLimiter,
}

impl OpenAIClient {
    /// Creates a client reading the key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is unset or empty.
    #[instrument(skip_all, fields(model = %model.as_ref()))]
    pub fn new(model: impl AsRef<str>) -> LullabyResult<Self> {
        let api_key = read_api_key(DEFAULT_API_KEY_ENV)?;
        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a client with an explicit key.
    pub fn with_api_key(api_key: impl Into<String>, model: impl AsRef<str>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.as_ref().to_string(),
            limiter: RateLimiter::new(60, 2),
        }
    }

    /// Creates a client from the `model` and `api` configuration sections.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` naming `api.api_key_env` if the key is unset.
    #[instrument(skip_all, fields(model = %config.model.name))]
    pub fn from_config(config: &LullabyConfig) -> LullabyResult<Self> {
        let api_key = read_api_key(&config.api.api_key_env)?;
        debug!(
            base_url = %config.api.base_url,
            rpm = config.api.requests_per_minute,
            max_concurrent = config.api.max_concurrent,
            "Creating chat client from configuration"
        );
        Ok(Self::with_api_key(api_key, &config.model.name)
            .with_base_url(&config.api.base_url)
            .with_rate_limiter(RateLimiter::new(
                config.api.requests_per_minute,
                config.api.max_concurrent,
            )))
    }

    /// Point the client at a different chat-completions URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the request limiter.
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Chat-completions URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request limiter in use.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    #[instrument(skip(self, body), fields(model = %body.model(), messages = body.messages().len()))]
    async fn post_chat(
        &self,
        body: &ChatCompletionRequest,
        timeout_secs: Option<u64>,
    ) -> Result<String, LlmError> {
        let mut request = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(secs) = timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::new(LlmErrorKind::Timeout(timeout_secs.unwrap_or_default()))
            } else {
                LlmError::new(LlmErrorKind::Connection(e.to_string()))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::new(LlmErrorKind::Timeout(timeout_secs.unwrap_or_default()))
            } else {
                LlmError::new(LlmErrorKind::Connection(e.to_string()))
            }
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            error!(status = %status, message = %message, "Chat API returned error");
            return Err(LlmError::new(LlmErrorKind::Http {
                status_code: status.as_u16(),
                message,
            }));
        }

        debug!(response_len = text.len(), "Received chat completion");
        Ok(text)
    }
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[redacted]")
            .field("limiter", &self.limiter)
            .finish()
    }
}

fn read_api_key(var: &str) -> Result<String, LlmError> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| LlmError::new(LlmErrorKind::MissingApiKey(var.to_string())))
}

#[async_trait]
impl LullabyDriver for OpenAIClient {
    #[instrument(skip(self, req), fields(model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> LullabyResult<GenerateResponse> {
        let body = ChatCompletionRequest::from_generate(req, &self.model);

        let _guard = self.limiter.acquire().await?;
        let text = self.post_chat(&body, req.timeout_secs).await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "Failed to parse chat completion");
            LlmError::new(LlmErrorKind::ResponseParsing(e.to_string()))
        })?;

        let content = parsed
            .first_content()
            .ok_or_else(|| LlmError::new(LlmErrorKind::EmptyResponse))?;

        Ok(GenerateResponse::from_text(content))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
