use crate::domain::error::DomainError;
use async_trait::async_trait;

/// HTML transport for evidence pages. Returns the raw page body; paragraph
/// extraction happens in the retriever's adapter layer.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}
