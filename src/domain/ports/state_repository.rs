use crate::domain::entities::event::Event;
use crate::domain::entities::sample::Sample;
use crate::domain::error::DomainError;
use crate::domain::values::day_stamp::DayStamp;

/// The active/resolved partition as read at run start. Stages treat this as
/// an immutable snapshot: the reconciler takes prior state in and hands next
/// state back, and the repository replaces files all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct EventState {
    pub active: Vec<Event>,
    pub resolved: Vec<Event>,
}

pub trait StateRepository: Send + Sync {
    fn load_state(&self) -> Result<EventState, DomainError>;
    /// Atomic replacement of both event files. A failure mid-save must not
    /// leave a half-written partition behind.
    fn save_state(&self, state: &EventState) -> Result<(), DomainError>;

    fn load_sample(&self, day: DayStamp) -> Result<Option<Sample>, DomainError>;
    fn save_sample(&self, sample: &Sample) -> Result<(), DomainError>;
}
