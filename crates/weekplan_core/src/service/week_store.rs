//! Replace-style week and event operations.
//!
//! # Responsibility
//! - Generate the default week list of a year.
//! - Apply theme, expansion and event edits to a week list.
//!
//! # Invariants
//! - Inputs are never mutated; every operation returns a new list.
//! - Order and ids of unaffected weeks and events are preserved.
//! - Unknown week or event ids leave the list unchanged.

use crate::model::schedule::week_date_range;
use crate::model::week::{Event, EventId, Week, WeekId, NEW_EVENT_TEXT, WEEKS_PER_YEAR};

/// Generates 52 empty weeks starting on the first Monday of `year`.
pub fn initialize_weeks(year: i32) -> Vec<Week> {
    (1..=WEEKS_PER_YEAR)
        .map(|week_id| Week::new(week_id, year, week_date_range(year, week_id)))
        .collect()
}

/// Completes a stored week list to the full 52 ordinal weeks of `year`.
///
/// Missing ids are filled with empty default weeks, an empty `date_range`
/// is re-derived, and the result is ordered by id. Stored themes, events
/// and expansion flags are kept.
pub fn complete_year(weeks: &[Week], year: i32) -> Vec<Week> {
    initialize_weeks(year)
        .into_iter()
        .map(|default| match weeks.iter().find(|week| week.id == default.id) {
            Some(stored) if stored.date_range.is_empty() => Week {
                date_range: default.date_range,
                ..stored.clone()
            },
            Some(stored) => stored.clone(),
            None => default,
        })
        .collect()
}

/// Sets both theme slots of one week.
pub fn update_theme(weeks: &[Week], week_id: WeekId, theme1: &str, theme2: &str) -> Vec<Week> {
    map_week(weeks, week_id, |week| Week {
        theme1: theme1.to_string(),
        theme2: theme2.to_string(),
        ..week.clone()
    })
}

/// Flips the expansion flag of one week.
pub fn toggle_expanded(weeks: &[Week], week_id: WeekId) -> Vec<Week> {
    map_week(weeks, week_id, |week| Week {
        expanded: !week.expanded,
        ..week.clone()
    })
}

/// Appends a `"New event"` entry and expands the week.
///
/// Returns the new list and the created event id, or `None` when
/// `week_id` is unknown.
pub fn add_event(weeks: &[Week], week_id: WeekId, now_ms: i64) -> (Vec<Week>, Option<EventId>) {
    let Some(target) = weeks.iter().find(|week| week.id == week_id) else {
        return (weeks.to_vec(), None);
    };
    let event_id = target.next_event_id(now_ms);

    let updated = map_week(weeks, week_id, |week| {
        let mut events = week.events.clone();
        events.push(Event::new(event_id, NEW_EVENT_TEXT));
        Week {
            events,
            expanded: true,
            ..week.clone()
        }
    });
    (updated, Some(event_id))
}

/// Replaces the text of one event.
pub fn update_event(weeks: &[Week], week_id: WeekId, event_id: EventId, text: &str) -> Vec<Week> {
    map_week(weeks, week_id, |week| Week {
        events: week
            .events
            .iter()
            .map(|event| {
                if event.id == event_id {
                    Event {
                        text: text.to_string(),
                        ..event.clone()
                    }
                } else {
                    event.clone()
                }
            })
            .collect(),
        ..week.clone()
    })
}

/// Removes one event by id.
pub fn delete_event(weeks: &[Week], week_id: WeekId, event_id: EventId) -> Vec<Week> {
    map_week(weeks, week_id, |week| Week {
        events: week
            .events
            .iter()
            .filter(|event| event.id != event_id)
            .cloned()
            .collect(),
        ..week.clone()
    })
}

fn map_week(weeks: &[Week], week_id: WeekId, update: impl Fn(&Week) -> Week) -> Vec<Week> {
    weeks
        .iter()
        .map(|week| {
            if week.id == week_id {
                update(week)
            } else {
                week.clone()
            }
        })
        .collect()
}
