use crate::application::build_snapshot::SnapshotBuilder;
use crate::domain::entities::event::Event;
use crate::domain::error::DomainError;
use crate::domain::ports::snapshot_store::SnapshotStore;
use crate::domain::ports::state_repository::StateRepository;
use crate::domain::values::day_stamp::DayStamp;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

pub struct ProcessChunkUseCase {
    state_repo: Arc<dyn StateRepository>,
    store: Arc<dyn SnapshotStore>,
    builder: Arc<SnapshotBuilder>,
    chunk_size: usize,
    event_limiter: Arc<Semaphore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Built,
    Degraded,
    Failed,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct EventBuildRecord {
    pub event_id: String,
    pub status: BuildStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub day: DayStamp,
    pub chunk_index: usize,
    pub attempted: usize,
    pub built: usize,
    pub degraded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub events: Vec<EventBuildRecord>,
}

impl ProcessChunkUseCase {
    pub fn new(
        state_repo: Arc<dyn StateRepository>,
        store: Arc<dyn SnapshotStore>,
        builder: Arc<SnapshotBuilder>,
        chunk_size: usize,
        event_concurrency: usize,
    ) -> Self {
        Self {
            state_repo,
            store,
            builder,
            chunk_size,
            event_limiter: Arc::new(Semaphore::new(event_concurrency)),
        }
    }

    /// Build and persist snapshots for one contiguous chunk of the day's
    /// sample. Events are independent: each builds under its own permit and
    /// records its own outcome, so one failure never aborts the chunk.
    /// Already-persisted (event, day) keys are skipped, which makes re-runs
    /// of an interrupted chunk cheap and idempotent.
    pub async fn execute(
        &self,
        day: DayStamp,
        chunk_index: usize,
    ) -> Result<RunReport, DomainError> {
        let sample = self.state_repo.load_sample(day)?.ok_or_else(|| {
            DomainError::NotFound(format!("no sample for {day}; run sample first"))
        })?;
        let state = self.state_repo.load_state()?;
        let active: HashMap<&str, &Event> = state
            .active
            .iter()
            .map(|e| (e.event_id.as_str(), e))
            .collect();

        let chunk = sample.chunk(chunk_index, self.chunk_size);
        info!(
            %day,
            chunk_index,
            events = chunk.len(),
            "processing chunk"
        );

        let builds = chunk
            .iter()
            .map(|event_id| self.process_event(event_id, active.get(event_id.as_str()).copied(), day));
        let events: Vec<EventBuildRecord> = futures::future::join_all(builds).await;

        let count = |status: BuildStatus| events.iter().filter(|r| r.status == status).count();
        let report = RunReport {
            day,
            chunk_index,
            attempted: events.len(),
            built: count(BuildStatus::Built),
            degraded: count(BuildStatus::Degraded),
            failed: count(BuildStatus::Failed),
            skipped: count(BuildStatus::Skipped),
            events,
        };
        info!(
            built = report.built,
            degraded = report.degraded,
            failed = report.failed,
            skipped = report.skipped,
            "chunk complete"
        );
        Ok(report)
    }

    async fn process_event(
        &self,
        event_id: &str,
        event: Option<&Event>,
        day: DayStamp,
    ) -> EventBuildRecord {
        let record = |status, detail: Option<String>| EventBuildRecord {
            event_id: event_id.to_string(),
            status,
            detail,
        };

        let _permit = match self.event_limiter.acquire().await {
            Ok(permit) => permit,
            Err(_) => return record(BuildStatus::Failed, Some("worker pool closed".into())),
        };

        match self.store.get(event_id, day) {
            Ok(Some(_)) => {
                return record(BuildStatus::Skipped, Some("snapshot already exists".into()))
            }
            Ok(None) => {}
            Err(e) => return record(BuildStatus::Failed, Some(e.to_string())),
        }

        let Some(event) = event else {
            // Sampled in the morning, reconciled away before this run.
            warn!(event_id, "sampled event no longer active, skipping");
            return record(BuildStatus::Skipped, Some("no longer active".into()));
        };

        match self.builder.build(event, day).await {
            Ok(outcome) => match self.store.put(&outcome.snapshot) {
                Ok(()) => {
                    if outcome.degraded {
                        record(BuildStatus::Degraded, None)
                    } else {
                        record(BuildStatus::Built, None)
                    }
                }
                Err(e) => record(BuildStatus::Failed, Some(format!("persist: {e}"))),
            },
            Err(e) => {
                warn!(event_id, error = %e, "snapshot build failed");
                record(BuildStatus::Failed, Some(e.to_string()))
            }
        }
    }
}
