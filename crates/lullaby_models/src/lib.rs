//! Chat model client for Lullaby.
//!
//! [`OpenAIClient`] implements [`LullabyDriver`](lullaby_interface::LullabyDriver)
//! against any OpenAI-compatible chat-completions endpoint.
//!
//! # Example
//!
//! ```no_run
//! use lullaby_core::{GenerateRequest, Message};
//! use lullaby_interface::LullabyDriver;
//! use lullaby_models::OpenAIClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAIClient::new("gpt-3.5-turbo")?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Tell me a story about a sleepy owl")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatResponseFormat, OpenAIClient,
};
