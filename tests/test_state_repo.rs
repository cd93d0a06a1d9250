mod common;

use common::listing;
use foresight::domain::entities::event::Event;
use foresight::domain::entities::sample::{Sample, StratumAllocation};
use foresight::domain::ports::state_repository::{EventState, StateRepository};
use foresight::domain::values::day_stamp::DayStamp;
use foresight::infrastructure::state::json_state_repo::JsonStateRepository;
use tempfile::TempDir;

fn event(id: &str, domain: &str) -> Event {
    Event::from_listing(&listing(id, domain), chrono::Utc::now())
}

#[test]
fn test_missing_files_load_as_empty_state() {
    let dir = TempDir::new().unwrap();
    let repo = JsonStateRepository::new(dir.path().join("state")).unwrap();

    let state = repo.load_state().unwrap();
    assert!(state.active.is_empty());
    assert!(state.resolved.is_empty());
    assert!(repo.load_sample(DayStamp::today()).unwrap().is_none());
}

#[test]
fn test_state_round_trip() {
    let dir = TempDir::new().unwrap();
    let repo = JsonStateRepository::new(dir.path()).unwrap();

    let mut resolved = event("B", "Economics");
    resolved.mark_resolved(chrono::Utc::now());
    repo.save_state(&EventState {
        active: vec![event("A", "Politics")],
        resolved: vec![resolved],
    })
    .unwrap();

    let state = repo.load_state().unwrap();
    assert_eq!(state.active.len(), 1);
    assert_eq!(state.active[0].event_id, "A");
    assert_eq!(state.resolved.len(), 1);
    assert_eq!(state.resolved[0].event_id, "B");
    assert!(state.resolved[0].resolved_at.is_some());
}

#[test]
fn test_no_temp_files_survive_a_save() {
    let dir = TempDir::new().unwrap();
    let repo = JsonStateRepository::new(dir.path()).unwrap();
    repo.save_state(&EventState {
        active: vec![event("A", "Politics")],
        resolved: vec![],
    })
    .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_sample_round_trip_keyed_by_day() {
    let dir = TempDir::new().unwrap();
    let repo = JsonStateRepository::new(dir.path()).unwrap();

    let day = DayStamp::today();
    let sample = Sample {
        sample_date: day,
        event_ids: vec!["A".into(), "B".into()],
        strata: vec![StratumAllocation {
            domain: "Politics".into(),
            population: 10,
            allocated: 2,
        }],
    };
    repo.save_sample(&sample).unwrap();

    let loaded = repo.load_sample(day).unwrap().unwrap();
    assert_eq!(loaded.event_ids, sample.event_ids);
    assert_eq!(loaded.strata.len(), 1);
    assert_eq!(loaded.strata[0].allocated, 2);

    let other_day = DayStamp::new(day.date().pred_opt().unwrap());
    assert!(repo.load_sample(other_day).unwrap().is_none());
}
