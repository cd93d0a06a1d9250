use crate::domain::error::DomainError;
use async_trait::async_trait;

/// LLM collaborator. Both pipeline call shapes (query generation and
/// summarization) are single-prompt request/response completions.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;
}
