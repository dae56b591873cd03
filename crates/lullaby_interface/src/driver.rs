//! Chat model backend trait.

use async_trait::async_trait;
use lullaby_core::{GenerateRequest, GenerateResponse};
use lullaby_error::LullabyResult;

/// Core trait that every chat model backend implements.
///
/// Every pipeline component (categorizer, storyteller, guardrails, judge)
/// talks to the model only through this trait, so tests can substitute a
/// scripted driver.
#[async_trait]
pub trait LullabyDriver: Send + Sync {
    /// Generate a reply for the given conversation.
    async fn generate(&self, req: &GenerateRequest) -> LullabyResult<GenerateResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-3.5-turbo").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: LullabyDriver + ?Sized> LullabyDriver for std::sync::Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> LullabyResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
