//! OpenAI-compatible chat completions.

mod client;
mod dto;

pub use client::OpenAIClient;
pub use dto::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatResponseFormat,
};
