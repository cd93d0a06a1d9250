mod common;

use common::{listing, pipeline_with, test_config, StubFeed, StubLlm};
use foresight::domain::ports::state_repository::StateRepository;
use foresight::domain::values::event_status::EventStatus;
use foresight::infrastructure::state::json_state_repo::JsonStateRepository;
use std::sync::Arc;
use tempfile::TempDir;

fn state_repo(dir: &TempDir) -> JsonStateRepository {
    JsonStateRepository::new(dir.path().join("state")).unwrap()
}

#[tokio::test]
async fn test_first_run_creates_active_set() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
            listing("C", "Economics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );

    let report = pipeline.reconcile().await.unwrap();
    assert_eq!(report.listed, 3);
    assert_eq!(report.newly_active, 3);
    assert_eq!(report.total_active, 3);
    assert_eq!(report.total_resolved, 0);

    let state = state_repo(&dir).load_state().unwrap();
    assert_eq!(state.active.len(), 3);
    assert!(state.resolved.is_empty());
    assert!(state
        .active
        .iter()
        .all(|e| e.status == EventStatus::Active && e.resolved_at.is_none()));
}

#[tokio::test]
async fn test_new_listing_event_joins_active() {
    let dir = TempDir::new().unwrap();
    let day1 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day1.reconcile().await.unwrap();

    let day2 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
            listing("C", "Economics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    let report = day2.reconcile().await.unwrap();
    assert_eq!(report.newly_active, 1);
    assert_eq!(report.newly_resolved, 0);

    let state = state_repo(&dir).load_state().unwrap();
    let mut ids: Vec<_> = state.active.iter().map(|e| e.event_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert!(state.resolved.is_empty());
}

#[tokio::test]
async fn test_absent_event_moves_to_resolved() {
    let dir = TempDir::new().unwrap();
    let day1 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day1.reconcile().await.unwrap();

    let day2 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![listing("A", "Politics")])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    let report = day2.reconcile().await.unwrap();
    assert_eq!(report.newly_resolved, 1);
    assert_eq!(report.total_active, 1);

    let state = state_repo(&dir).load_state().unwrap();
    assert_eq!(state.active.len(), 1);
    assert_eq!(state.active[0].event_id, "A");
    assert_eq!(state.resolved.len(), 1);
    assert_eq!(state.resolved[0].event_id, "B");
    assert_eq!(state.resolved[0].status, EventStatus::Resolved);
    assert!(state.resolved[0].resolved_at.is_some());
}

#[tokio::test]
async fn test_resolved_membership_is_monotone() {
    let dir = TempDir::new().unwrap();
    let day1 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day1.reconcile().await.unwrap();

    let day2 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![listing("A", "Politics")])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day2.reconcile().await.unwrap();

    // B reappears upstream; it must stay resolved.
    let day3 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Politics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    let report = day3.reconcile().await.unwrap();
    assert_eq!(report.newly_active, 0);
    assert_eq!(report.total_resolved, 1);

    let state = state_repo(&dir).load_state().unwrap();
    assert_eq!(state.active.len(), 1);
    assert_eq!(state.resolved.len(), 1);
    assert_eq!(state.resolved[0].event_id, "B");
}

#[tokio::test]
async fn test_feed_failure_leaves_state_files_untouched() {
    let dir = TempDir::new().unwrap();
    let day1 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![
            listing("A", "Politics"),
            listing("B", "Economics"),
        ])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day1.reconcile().await.unwrap();

    let active_path = dir.path().join("state/active_events.json");
    let resolved_path = dir.path().join("state/resolved_events.json");
    let active_before = std::fs::read(&active_path).unwrap();
    let resolved_before = std::fs::read(&resolved_path).unwrap();

    let day2 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::down()),
        Arc::new(StubLlm::well_behaved(6)),
    );
    let err = day2.reconcile().await.unwrap_err();
    assert!(matches!(
        err,
        foresight::domain::error::DomainError::UpstreamUnavailable(_)
    ));

    assert_eq!(std::fs::read(&active_path).unwrap(), active_before);
    assert_eq!(std::fs::read(&resolved_path).unwrap(), resolved_before);
}

#[tokio::test]
async fn test_empty_listing_is_treated_as_unavailable() {
    let dir = TempDir::new().unwrap();
    let day1 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![listing("A", "Politics")])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    day1.reconcile().await.unwrap();

    // An empty listing must not resolve every active event.
    let day2 = pipeline_with(
        test_config(&dir),
        Arc::new(StubFeed::up(vec![])),
        Arc::new(StubLlm::well_behaved(6)),
    );
    let err = day2.reconcile().await.unwrap_err();
    assert!(matches!(
        err,
        foresight::domain::error::DomainError::UpstreamUnavailable(_)
    ));

    let state = state_repo(&dir).load_state().unwrap();
    assert_eq!(state.active.len(), 1);
    assert!(state.resolved.is_empty());
}
