use crate::domain::values::day_stamp::DayStamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The frozen evidence bundle for one event on one day. Never edited after
/// storage — a later day produces a new record under a new (event, day) key.
/// `captured_at` precedes the event's resolution by construction: snapshots
/// are only built for events still in the active set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub event_id: String,
    pub day: DayStamp,
    pub captured_at: DateTime<Utc>,
    /// Concatenation of the per-query summary sections, in query order.
    /// Always contains exactly one section per query, empty or not.
    pub report_text: String,
    pub queries_used: Vec<String>,
    pub source_urls: Vec<String>,
}
