use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::values::day_stamp::DayStamp;

/// Persistent home of finished snapshots. `put` is an idempotent upsert on
/// (event_id, day): a retried build overwrites rather than duplicates.
pub trait SnapshotStore: Send + Sync {
    fn put(&self, snapshot: &Snapshot) -> Result<(), DomainError>;
    fn get(&self, event_id: &str, day: DayStamp) -> Result<Option<Snapshot>, DomainError>;
    /// Snapshot count for one day, used by the run report.
    fn count_for_day(&self, day: DayStamp) -> Result<usize, DomainError>;
}
