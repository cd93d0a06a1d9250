use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Market listing fetch failed or came back empty. Reconciliation must
    /// abort rather than diff against it: an empty listing would resolve
    /// every active event.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// LLM output violated a structural constraint (query count, word ceiling).
    #[error("Generation contract violation: {0}")]
    GenerationContract(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::Persistence(s)
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
