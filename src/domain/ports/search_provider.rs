use crate::domain::error::DomainError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Publication date when the provider reports one.
    pub published: Option<String>,
}

/// Web search collaborator, called once per generated query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, DomainError>;
}
