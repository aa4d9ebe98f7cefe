//! Week, event and calendar records.
//!
//! # Responsibility
//! - Define the canonical records persisted under `<app>-weeks-<year>`.
//! - Validate structural invariants before persistence and after reads.
//!
//! # Invariants
//! - `Week::id` is a stable ordinal in `1..=WEEKS_PER_YEAR`.
//! - `Event::id` is a creation timestamp (epoch ms) unique within one week.
//! - Serialized field names match the persisted JSON layout
//!   (`id, year, theme1, theme2, dateRange, events, expanded`).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable week ordinal inside a planning year.
pub type WeekId = u32;

/// Event identifier; creation time in Unix epoch milliseconds.
pub type EventId = i64;

/// Number of week slots in one planning year.
pub const WEEKS_PER_YEAR: u32 = 52;

/// Day label carried by every event. Kept for layout compatibility only.
pub const DEFAULT_EVENT_DAY: &str = "Monday";

/// Placeholder text for freshly added events.
pub const NEW_EVENT_TEXT: &str = "New event";

/// Default calendar identity for the single family calendar.
pub const DEFAULT_CALENDAR_ID: u32 = 1;
pub const DEFAULT_CALENDAR_NAME: &str = "Family Calendar";

/// Free-text item attached to one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub text: String,
    /// Unused by planner logic; always `"Monday"` for new events.
    #[serde(default = "default_event_day")]
    pub day: String,
}

impl Event {
    /// Creates an event with the fixed default day label.
    pub fn new(id: EventId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            day: DEFAULT_EVENT_DAY.to_string(),
        }
    }
}

fn default_event_day() -> String {
    DEFAULT_EVENT_DAY.to_string()
}

/// One of the 52 ordinal slots of a planning year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub id: WeekId,
    pub year: i32,
    #[serde(default)]
    pub theme1: String,
    #[serde(default)]
    pub theme2: String,
    /// Display string such as `"Jan 5 - Jan 11"`.
    #[serde(default)]
    pub date_range: String,
    #[serde(default)]
    pub events: Vec<Event>,
    /// UI expansion flag. Persisted together with the week.
    #[serde(default)]
    pub expanded: bool,
}

impl Week {
    /// Creates an empty, collapsed week.
    pub fn new(id: WeekId, year: i32, date_range: impl Into<String>) -> Self {
        Self {
            id,
            year,
            theme1: String::new(),
            theme2: String::new(),
            date_range: date_range.into(),
            events: Vec::new(),
            expanded: false,
        }
    }

    /// Joins non-empty theme slots with a bullet separator.
    pub fn theme_label(&self) -> String {
        match (self.theme1.is_empty(), self.theme2.is_empty()) {
            (false, false) => format!("{} \u{2022} {}", self.theme1, self.theme2),
            (false, true) => self.theme1.clone(),
            (true, false) => self.theme2.clone(),
            (true, true) => String::new(),
        }
    }

    pub fn event(&self, event_id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == event_id)
    }

    /// Returns an event id derived from `now_ms` that is unused in this week.
    ///
    /// Two events created within the same millisecond get consecutive ids.
    pub fn next_event_id(&self, now_ms: i64) -> EventId {
        let max_existing = self.events.iter().map(|event| event.id).max();
        match max_existing {
            Some(max) if max >= now_ms => max.saturating_add(1),
            _ => now_ms,
        }
    }

    /// Validates week ordinal range and event id uniqueness.
    ///
    /// # Errors
    /// - `IdOutOfRange` when `id` is outside `1..=52`.
    /// - `DuplicateEventId` when two events share an id.
    pub fn validate(&self) -> Result<(), WeekValidationError> {
        if self.id == 0 || self.id > WEEKS_PER_YEAR {
            return Err(WeekValidationError::IdOutOfRange(self.id));
        }

        let mut seen = HashSet::with_capacity(self.events.len());
        for event in &self.events {
            if !seen.insert(event.id) {
                return Err(WeekValidationError::DuplicateEventId {
                    week_id: self.id,
                    event_id: event.id,
                });
            }
        }

        Ok(())
    }
}

/// Validates every week and rejects duplicate week ids.
pub fn validate_weeks(weeks: &[Week]) -> Result<(), WeekValidationError> {
    let mut seen = HashSet::with_capacity(weeks.len());
    for week in weeks {
        week.validate()?;
        if !seen.insert(week.id) {
            return Err(WeekValidationError::DuplicateWeekId(week.id));
        }
    }
    Ok(())
}

/// Structural validation failure for weeks and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekValidationError {
    IdOutOfRange(WeekId),
    DuplicateWeekId(WeekId),
    DuplicateEventId { week_id: WeekId, event_id: EventId },
}

impl Display for WeekValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdOutOfRange(id) => {
                write!(f, "week id {id} is outside 1..={WEEKS_PER_YEAR}")
            }
            Self::DuplicateWeekId(id) => write!(f, "duplicate week id {id}"),
            Self::DuplicateEventId { week_id, event_id } => {
                write!(f, "duplicate event id {event_id} in week {week_id}")
            }
        }
    }
}

impl Error for WeekValidationError {}

/// Year-scoped calendar envelope returned by storage reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: u32,
    pub name: String,
    pub year: i32,
    pub weeks: Vec<Week>,
}

impl Calendar {
    /// Creates the default family calendar for `year`.
    pub fn new(year: i32, weeks: Vec<Week>) -> Self {
        Self {
            id: DEFAULT_CALENDAR_ID,
            name: DEFAULT_CALENDAR_NAME.to_string(),
            year,
            weeks,
        }
    }
}
