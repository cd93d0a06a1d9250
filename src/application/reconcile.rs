use crate::domain::entities::event::Event;
use crate::domain::error::DomainError;
use crate::domain::ports::market_feed::{EventListing, MarketFeed};
use crate::domain::ports::state_repository::{EventState, StateRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ReconcileUseCase {
    feed: Arc<dyn MarketFeed>,
    state_repo: Arc<dyn StateRepository>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub listed: usize,
    pub carried_active: usize,
    pub newly_active: usize,
    pub newly_resolved: usize,
    pub total_active: usize,
    pub total_resolved: usize,
}

/// Merge the current upstream listing with prior state. Pure: takes prior
/// state in, hands next state back.
///
/// - present + previously active  → stays active, last_seen_at updated
/// - absent + previously active   → resolved, resolved_at = now
/// - present + never seen         → new active event
/// - previously resolved          → carried forward unchanged (monotone)
pub fn reconcile(
    listing: &[EventListing],
    prior: EventState,
    now: DateTime<Utc>,
) -> EventState {
    let listed_ids: HashSet<&str> = listing.iter().map(|l| l.id.as_str()).collect();
    let known_ids: HashSet<String> = prior
        .active
        .iter()
        .chain(prior.resolved.iter())
        .map(|e| e.event_id.clone())
        .collect();

    let mut next_active = Vec::new();
    let mut next_resolved = prior.resolved;

    for mut event in prior.active {
        if listed_ids.contains(event.event_id.as_str()) {
            event.last_seen_at = now;
            next_active.push(event);
        } else {
            // resolved_at is an approximation: first-detected-absence lags
            // the true close by up to one polling interval.
            warn!(event_id = %event.event_id, "event absent from listing, marking resolved");
            event.mark_resolved(now);
            next_resolved.push(event);
        }
    }

    for entry in listing {
        if !known_ids.contains(&entry.id) {
            next_active.push(Event::from_listing(entry, now));
        }
    }

    EventState {
        active: next_active,
        resolved: next_resolved,
    }
}

impl ReconcileUseCase {
    pub fn new(feed: Arc<dyn MarketFeed>, state_repo: Arc<dyn StateRepository>) -> Self {
        Self { feed, state_repo }
    }

    /// Daily reconciliation: fetch the listing, diff against prior state,
    /// atomically replace the state files. An unavailable or empty listing
    /// aborts without touching prior state — diffing against it would
    /// resolve every active event.
    pub async fn execute(&self) -> Result<ReconcileReport, DomainError> {
        let listing = self
            .feed
            .list_open_events()
            .await
            .map_err(|e| DomainError::UpstreamUnavailable(format!("{}: {e}", self.feed.name())))?;
        if listing.is_empty() {
            return Err(DomainError::UpstreamUnavailable(format!(
                "{} returned an empty listing",
                self.feed.name()
            )));
        }

        let prior = self.state_repo.load_state()?;
        let prior_active = prior.active.len();
        let prior_resolved = prior.resolved.len();

        let now = Utc::now();
        let next = reconcile(&listing, prior, now);

        let report = ReconcileReport {
            listed: listing.len(),
            carried_active: next
                .active
                .iter()
                .filter(|e| e.first_seen_at != now)
                .count(),
            newly_active: next.active.len() + next.resolved.len()
                - prior_active
                - prior_resolved,
            newly_resolved: next.resolved.len() - prior_resolved,
            total_active: next.active.len(),
            total_resolved: next.resolved.len(),
        };

        self.state_repo.save_state(&next)?;
        info!(
            listed = report.listed,
            active = report.total_active,
            resolved = report.total_resolved,
            new = report.newly_active,
            "reconciliation complete"
        );
        Ok(report)
    }
}
