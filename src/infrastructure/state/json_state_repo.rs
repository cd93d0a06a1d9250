use crate::domain::entities::event::Event;
use crate::domain::entities::sample::Sample;
use crate::domain::error::DomainError;
use crate::domain::ports::state_repository::{EventState, StateRepository};
use crate::domain::values::day_stamp::DayStamp;
use std::fs;
use std::path::{Path, PathBuf};

const ACTIVE_FILE: &str = "active_events.json";
const RESOLVED_FILE: &str = "resolved_events.json";

/// Durable event state as JSON files in one directory: active_events.json,
/// resolved_events.json, and one sample_YYYYMMDD.json per day. Writes go to
/// a temp file first and land via rename, so readers never see a
/// half-written file.
pub struct JsonStateRepository {
    dir: PathBuf,
}

impl JsonStateRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| DomainError::Persistence(format!("create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn sample_file(&self, day: DayStamp) -> PathBuf {
        self.dir.join(format!("sample_{day}.json"))
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::Persistence(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DomainError::Parse(format!("parse {}: {e}", path.display())))
    }

    fn stage_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<PathBuf, DomainError> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| DomainError::Parse(format!("serialize {}: {e}", path.display())))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|e| DomainError::Persistence(format!("write {}: {e}", tmp.display())))?;
        Ok(tmp)
    }

    fn commit(tmp: &Path, path: &Path) -> Result<(), DomainError> {
        fs::rename(tmp, path)
            .map_err(|e| DomainError::Persistence(format!("rename {}: {e}", path.display())))
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
        let tmp = Self::stage_json(path, value)?;
        Self::commit(&tmp, path)
    }
}

impl StateRepository for JsonStateRepository {
    fn load_state(&self) -> Result<EventState, DomainError> {
        // Missing files mean a first run, not corruption.
        let active: Vec<Event> =
            Self::read_json(&self.dir.join(ACTIVE_FILE))?.unwrap_or_default();
        let resolved: Vec<Event> =
            Self::read_json(&self.dir.join(RESOLVED_FILE))?.unwrap_or_default();
        Ok(EventState { active, resolved })
    }

    fn save_state(&self, state: &EventState) -> Result<(), DomainError> {
        // Stage both files before renaming either, so a serialization or
        // write failure leaves the prior partition fully intact.
        let active_path = self.dir.join(ACTIVE_FILE);
        let resolved_path = self.dir.join(RESOLVED_FILE);
        let active_tmp = Self::stage_json(&active_path, &state.active)?;
        let resolved_tmp = Self::stage_json(&resolved_path, &state.resolved)?;
        Self::commit(&active_tmp, &active_path)?;
        Self::commit(&resolved_tmp, &resolved_path)
    }

    fn load_sample(&self, day: DayStamp) -> Result<Option<Sample>, DomainError> {
        Self::read_json(&self.sample_file(day))
    }

    fn save_sample(&self, sample: &Sample) -> Result<(), DomainError> {
        Self::write_json(&self.sample_file(sample.sample_date), sample)
    }
}
