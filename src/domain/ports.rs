use crate::domain::model::Prompt;
use crate::utils::error::Result;
use async_trait::async_trait;

/// One prompt in, generated text out. Implementations make exactly one
/// outbound call per invocation and never retry.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}

#[async_trait]
impl<T: TextProvider + ?Sized> TextProvider for std::sync::Arc<T> {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        (**self).generate(prompt).await
    }
}
