//! Chat-completions wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use lullaby_core::{GenerateRequest, Message, ResponseFormat};
use serde::{Deserialize, Serialize};

/// One message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// "system", "user", or "assistant"
    role: String,
    /// Message text, absent in some refusal replies
    #[serde(default)]
    content: Option<String>,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.to_string(),
            content: Some(message.content.clone()),
        }
    }
}

/// `response_format` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponseFormat {
    /// "text" or "json_object"
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<ResponseFormat> for ChatResponseFormat {
    fn from(format: ResponseFormat) -> Self {
        let kind = match format {
            ResponseFormat::Text => "text",
            ResponseFormat::JsonObject => "json_object",
        };
        Self {
            kind: kind.to_string(),
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatCompletionRequest {
    /// Model identifier
    model: String,
    /// Conversation
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Token limit
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Output format
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ChatResponseFormat>,
}

impl ChatCompletionRequest {
    /// Creates a new builder for `ChatCompletionRequest`.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }

    /// Wire request for `req`, using `default_model` unless the request names one.
    pub fn from_generate(req: &GenerateRequest, default_model: &str) -> Self {
        Self {
            model: req
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            messages: req.messages.iter().map(ChatMessage::from).collect(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            response_format: req.response_format.map(ChatResponseFormat::from),
        }
    }
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatChoice {
    /// Generated message
    message: ChatMessage,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Chat-completions response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    /// Completion choices
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if present and non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub(crate) message: String,
}
