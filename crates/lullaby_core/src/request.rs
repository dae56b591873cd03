//! Request and response types for chat generation.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Output format requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// A single JSON object (provider-enforced JSON mode)
    JsonObject,
}

/// Provider-agnostic generation request.
///
/// # Examples
///
/// ```
/// use lullaby_core::{GenerateRequest, Message, ResponseFormat};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![
///         Message::system("You are a content safety expert."),
///         Message::user("Is this story safe?"),
///     ])
///     .max_tokens(300u32)
///     .temperature(0.1f32)
///     .response_format(ResponseFormat::JsonObject)
///     .timeout_secs(20u64)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.max_tokens, Some(300));
/// assert_eq!(request.model, None);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Model identifier, overriding the driver default
    pub model: Option<String>,
    /// Requested output format
    pub response_format: Option<ResponseFormat>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// A single generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Output {
    /// Text content
    Text(String),
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use lullaby_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("Once upon a time...".to_string())],
/// };
/// assert_eq!(response.text(), "Once upon a time...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Wrap a single text reply.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![Output::Text(text.into())],
        }
    }

    /// Concatenated text of every output.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .map(|output| match output {
                Output::Text(text) => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
