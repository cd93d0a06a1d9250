use crate::domain::ports::market_feed::EventListing;
use crate::domain::values::event_status::EventStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A forecasting question monitored over time. Created on first observation
/// from the upstream listing, migrated (never deleted) between the active
/// and resolved sets by the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub title: String,
    pub subtitle: String,
    pub resolution_rules: String,
    /// Category/stratum label used by the sampler.
    pub domain: String,
    pub market_count: u32,
    pub status: EventStatus,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    /// First-detected-absence from the upstream listing. An upper bound on
    /// the true resolution time, lagging by up to one polling interval.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn from_listing(listing: &EventListing, now: DateTime<Utc>) -> Self {
        Self {
            event_id: listing.id.clone(),
            title: listing.title.clone(),
            subtitle: listing.subtitle.clone(),
            resolution_rules: listing.resolution_rules.clone(),
            domain: listing.domain.clone(),
            market_count: listing.market_count,
            status: EventStatus::Active,
            first_seen_at: now,
            last_seen_at: now,
            resolved_at: None,
        }
    }

    pub fn mark_resolved(&mut self, now: DateTime<Utc>) {
        self.status = EventStatus::Resolved;
        self.resolved_at = Some(now);
    }

    /// Market metadata block that conditions the query-generation and
    /// summarization prompts and serves as the similarity reference text.
    pub fn market_description(&self) -> String {
        let mut desc = format!("Event title: {}\n", self.title);
        if !self.subtitle.is_empty() {
            desc.push_str(&format!("Subtitle: {}\n", self.subtitle));
        }
        desc.push_str("Possible Outcomes: Yes (0) or No (1)\n");
        if !self.resolution_rules.is_empty() {
            desc.push_str(&format!("Rules: {}\n", self.resolution_rules));
        }
        desc
    }
}
