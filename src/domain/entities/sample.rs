use crate::domain::values::day_stamp::DayStamp;
use serde::{Deserialize, Serialize};

/// Per-stratum bookkeeping kept with the sample so proportionality is
/// auditable after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratumAllocation {
    pub domain: String,
    pub population: usize,
    pub allocated: usize,
}

/// The day's chosen subset of active events, immutable after creation.
/// Sharded build runs each take one contiguous chunk of `event_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub sample_date: DayStamp,
    pub event_ids: Vec<String>,
    pub strata: Vec<StratumAllocation>,
}

impl Sample {
    /// Contiguous slice processed by the run with the given chunk index.
    /// Out-of-range indices yield an empty slice.
    pub fn chunk(&self, index: usize, size: usize) -> &[String] {
        let start = index.saturating_mul(size).min(self.event_ids.len());
        let end = start.saturating_add(size).min(self.event_ids.len());
        &self.event_ids[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Sample {
        Sample {
            sample_date: DayStamp::today(),
            event_ids: (0..n).map(|i| format!("EV-{i}")).collect(),
            strata: vec![],
        }
    }

    #[test]
    fn test_chunk_boundaries() {
        let s = sample(10);
        assert_eq!(s.chunk(0, 4).len(), 4);
        assert_eq!(s.chunk(1, 4).len(), 4);
        assert_eq!(s.chunk(2, 4), &["EV-8", "EV-9"]);
        assert!(s.chunk(3, 4).is_empty());
    }

    #[test]
    fn test_chunk_larger_than_sample() {
        let s = sample(3);
        assert_eq!(s.chunk(0, 70).len(), 3);
    }
}
