use crate::domain::entities::event::Event;
use crate::domain::entities::sample::{Sample, StratumAllocation};
use crate::domain::error::DomainError;
use crate::domain::ports::state_repository::StateRepository;
use crate::domain::values::day_stamp::DayStamp;
use crate::domain::values::stratify::largest_remainder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

pub struct SampleUseCase {
    state_repo: Arc<dyn StateRepository>,
}

/// Stratified draw from the active set: partition by domain, allocate the
/// target proportionally with largest-remainder rounding, draw uniformly
/// without replacement inside each stratum. A stratum smaller than its
/// allocation is taken whole and the shortfall is redistributed among the
/// remaining strata until the target is met or the population runs out.
pub fn stratified_sample(
    active: &[Event],
    target: usize,
    day: DayStamp,
    rng: &mut StdRng,
) -> Sample {
    // BTreeMap keeps stratum order deterministic across runs.
    let mut strata: BTreeMap<&str, Vec<&Event>> = BTreeMap::new();
    for event in active {
        strata.entry(event.domain.as_str()).or_default().push(event);
    }

    let domains: Vec<&str> = strata.keys().copied().collect();
    let populations: Vec<usize> = domains.iter().map(|d| strata[d].len()).collect();

    // Shuffle each stratum once; taking a prefix is then a uniform draw
    // without replacement, and redistribution rounds just extend it.
    let mut shuffled: Vec<Vec<&Event>> = domains
        .iter()
        .map(|d| {
            let mut events = strata[d].clone();
            events.shuffle(rng);
            events
        })
        .collect();

    let mut taken = vec![0usize; domains.len()];
    let mut remaining_target = target.min(active.len());
    while remaining_target > 0 {
        let capacity: Vec<usize> = populations
            .iter()
            .zip(&taken)
            .map(|(pop, got)| pop - got)
            .collect();
        if capacity.iter().all(|&c| c == 0) {
            break;
        }
        let allocation = largest_remainder(remaining_target, &capacity);
        let mut satisfied = 0;
        for (i, alloc) in allocation.iter().enumerate() {
            let take = (*alloc).min(capacity[i]);
            taken[i] += take;
            satisfied += take;
        }
        remaining_target -= satisfied;
        if satisfied == 0 {
            break;
        }
    }

    let mut event_ids = Vec::new();
    let mut allocations = Vec::new();
    for (i, domain) in domains.iter().enumerate() {
        event_ids.extend(
            shuffled[i]
                .drain(..taken[i])
                .map(|e| e.event_id.clone()),
        );
        allocations.push(StratumAllocation {
            domain: domain.to_string(),
            population: populations[i],
            allocated: taken[i],
        });
    }

    Sample {
        sample_date: day,
        event_ids,
        strata: allocations,
    }
}

impl SampleUseCase {
    pub fn new(state_repo: Arc<dyn StateRepository>) -> Self {
        Self { state_repo }
    }

    /// Draw the day's sample from the post-reconciliation active set and
    /// persist it. The draw is pseudo-randomized per run; pass a seed to
    /// reproduce one.
    pub fn execute(
        &self,
        day: DayStamp,
        target: usize,
        seed: Option<u64>,
    ) -> Result<Sample, DomainError> {
        let state = self.state_repo.load_state()?;
        if state.active.is_empty() {
            return Err(DomainError::InvalidInput(
                "no active events to sample; run reconcile first".to_string(),
            ));
        }

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let sample = stratified_sample(&state.active, target, day, &mut rng);

        for stratum in &sample.strata {
            info!(
                domain = %stratum.domain,
                population = stratum.population,
                allocated = stratum.allocated,
                "stratum allocation"
            );
        }
        self.state_repo.save_sample(&sample)?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::market_feed::EventListing;
    use chrono::Utc;
    use std::collections::HashSet;

    fn events(domain: &str, n: usize) -> Vec<Event> {
        (0..n)
            .map(|i| {
                Event::from_listing(
                    &EventListing {
                        id: format!("{domain}-{i}"),
                        title: format!("{domain} event {i}"),
                        subtitle: String::new(),
                        resolution_rules: String::new(),
                        domain: domain.to_string(),
                        market_count: 1,
                    },
                    Utc::now(),
                )
            })
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(37)
    }

    #[test]
    fn test_sample_size_is_min_of_target_and_population() {
        let mut active = events("Politics", 30);
        active.extend(events("Economics", 10));

        let sample = stratified_sample(&active, 20, DayStamp::today(), &mut rng());
        assert_eq!(sample.event_ids.len(), 20);

        let sample = stratified_sample(&active, 100, DayStamp::today(), &mut rng());
        assert_eq!(sample.event_ids.len(), 40);
    }

    #[test]
    fn test_no_duplicates() {
        let mut active = events("Politics", 50);
        active.extend(events("Science", 25));
        let sample = stratified_sample(&active, 60, DayStamp::today(), &mut rng());
        let unique: HashSet<_> = sample.event_ids.iter().collect();
        assert_eq!(unique.len(), sample.event_ids.len());
    }

    #[test]
    fn test_proportional_within_rounding() {
        let mut active = events("Politics", 300);
        active.extend(events("Economics", 150));
        active.extend(events("Science", 50));

        let sample = stratified_sample(&active, 100, DayStamp::today(), &mut rng());
        let by_domain: std::collections::HashMap<_, _> = sample
            .strata
            .iter()
            .map(|s| (s.domain.as_str(), s.allocated))
            .collect();

        // Proportions are 60/30/10; largest remainder stays within 1.
        assert!((by_domain["Politics"] as i64 - 60).abs() <= 1);
        assert!((by_domain["Economics"] as i64 - 30).abs() <= 1);
        assert!((by_domain["Science"] as i64 - 10).abs() <= 1);
        assert_eq!(sample.event_ids.len(), 100);
    }

    #[test]
    fn test_small_stratum_taken_whole() {
        let mut active = events("Politics", 100);
        active.extend(events("Weather", 3));

        // Target close to the population: the tiny stratum is exhausted and
        // the rest of the draw comes from the large one.
        let sample = stratified_sample(&active, 100, DayStamp::today(), &mut rng());
        assert_eq!(sample.event_ids.len(), 100);

        let weather = sample
            .strata
            .iter()
            .find(|s| s.domain == "Weather")
            .unwrap();
        assert_eq!(weather.allocated, 3);
        let politics = sample
            .strata
            .iter()
            .find(|s| s.domain == "Politics")
            .unwrap();
        assert_eq!(politics.allocated, 97);
    }

    #[test]
    fn test_seeded_draw_is_reproducible() {
        let active = events("Politics", 40);
        let a = stratified_sample(&active, 10, DayStamp::today(), &mut rng());
        let b = stratified_sample(&active, 10, DayStamp::today(), &mut rng());
        assert_eq!(a.event_ids, b.event_ids);
    }
}
