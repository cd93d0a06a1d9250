use crate::domain::error::DomainError;
use async_trait::async_trait;

/// One open event as reported by the upstream market, normalized to the
/// Event attribute shape. The adapter applies the complexity cap before
/// anything reaches the reconciler.
#[derive(Debug, Clone)]
pub struct EventListing {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub resolution_rules: String,
    pub domain: String,
    pub market_count: u32,
}

/// Upstream prediction-market listing, called once per daily run.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Name of this feed (e.g., "kalshi")
    fn name(&self) -> &str;

    /// Full snapshot of currently open events. A transport failure must
    /// surface as an error — never as an empty listing.
    async fn list_open_events(&self) -> Result<Vec<EventListing>, DomainError>;
}
