//! Planner session: the owned application state of an unlocked planner.
//!
//! # Responsibility
//! - Load (or generate) the week list of the configured year.
//! - Apply week/event edits and the theme editing lifecycle.
//! - Schedule debounced writes and run them on `tick`/`flush`.
//!
//! # Invariants
//! - `version` increases exactly when the week list changes.
//! - Loading never schedules a write; only post-load edits do.
//! - After open the week list always holds ids `1..=52` with date ranges.
//! - Write failures are logged and dropped; memory stays authoritative.

use crate::config::PlannerConfig;
use crate::model::week::{Calendar, EventId, Week, WeekId};
use crate::repo::calendar_repo::CalendarStorage;
use crate::repo::kv_store::KeyValueStore;
use crate::service::debounce::{PendingWrite, PersistDebouncer};
use crate::service::week_store;
use log::{debug, error, info, warn};
use std::time::Instant;

/// Where the session's initial week list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from storage (possibly schema-migrated).
    Persisted,
    /// Nothing stored; default weeks generated.
    Generated,
    /// Stored data was unreadable; default weeks generated.
    Recovered,
}

/// In-progress theme edit of one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDraft {
    pub week_id: WeekId,
    pub theme1: String,
    pub theme2: String,
}

/// Result of one executed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Written { version: u64 },
    Failed { version: u64 },
}

/// Time source used to stamp edits for the save debounce.
pub type SessionClock = Box<dyn Fn() -> Instant>;

pub struct PlannerSession<S: KeyValueStore> {
    storage: CalendarStorage<S>,
    clock: SessionClock,
    calendar: Calendar,
    load_source: LoadSource,
    version: u64,
    last_written: Option<u64>,
    debouncer: PersistDebouncer,
    theme_draft: Option<ThemeDraft>,
    editing_event: Option<(WeekId, EventId)>,
}

impl<S: KeyValueStore> PlannerSession<S> {
    /// Runs legacy cleanup, then loads the configured year.
    ///
    /// Never fails: unreadable or empty storage yields 52 default weeks,
    /// and a partial stored list is completed to the full year.
    pub fn open(storage: CalendarStorage<S>, config: &PlannerConfig) -> Self {
        Self::open_with_clock(storage, config, Instant::now)
    }

    /// Like `open`, but edits are stamped with `clock` instead of the
    /// system monotonic clock.
    pub fn open_with_clock(
        storage: CalendarStorage<S>,
        config: &PlannerConfig,
        clock: impl Fn() -> Instant + 'static,
    ) -> Self {
        let year = config.year;
        if let Err(err) = storage.run_legacy_cleanup(year, config.purge_year) {
            warn!("event=legacy_cleanup module=session status=error year={year} error={err}");
        }

        let (calendar, load_source) = match storage.load(year) {
            Ok(calendar) if !calendar.weeks.is_empty() => {
                let weeks = week_store::complete_year(&calendar.weeks, year);
                (Calendar { weeks, ..calendar }, LoadSource::Persisted)
            }
            Ok(calendar) => (
                Calendar {
                    weeks: week_store::initialize_weeks(year),
                    ..calendar
                },
                LoadSource::Generated,
            ),
            Err(err) => {
                warn!(
                    "event=calendar_load module=session status=fallback year={year} error={err}"
                );
                (
                    Calendar::new(year, week_store::initialize_weeks(year)),
                    LoadSource::Recovered,
                )
            }
        };
        info!(
            "event=session_open module=session status=ok year={year} source={load_source:?} weeks={}",
            calendar.weeks.len()
        );

        Self {
            storage,
            clock: Box::new(clock),
            calendar,
            load_source,
            version: 0,
            last_written: None,
            debouncer: PersistDebouncer::new(config.save_delay),
            theme_draft: None,
            editing_event: None,
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn weeks(&self) -> &[Week] {
        &self.calendar.weeks
    }

    pub fn week(&self, week_id: WeekId) -> Option<&Week> {
        self.calendar.weeks.iter().find(|week| week.id == week_id)
    }

    pub fn year(&self) -> i32 {
        self.calendar.year
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Data version; `0` right after load.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version of the last successful write in this session.
    pub fn last_written_version(&self) -> Option<u64> {
        self.last_written
    }

    pub fn pending_write(&self) -> Option<PendingWrite> {
        self.debouncer.pending()
    }

    pub fn update_theme(&mut self, week_id: WeekId, theme1: &str, theme2: &str) -> bool {
        let next = week_store::update_theme(self.weeks(), week_id, theme1, theme2);
        self.replace_weeks(next)
    }

    pub fn toggle_expanded(&mut self, week_id: WeekId) -> bool {
        let next = week_store::toggle_expanded(self.weeks(), week_id);
        self.replace_weeks(next)
    }

    /// Adds a `"New event"` entry stamped with the current time.
    pub fn add_event(&mut self, week_id: WeekId) -> Option<EventId> {
        self.add_event_at(week_id, chrono::Utc::now().timestamp_millis())
    }

    /// Adds an event using `now_ms` as the id seed; the new event becomes
    /// the one being edited.
    pub fn add_event_at(&mut self, week_id: WeekId, now_ms: i64) -> Option<EventId> {
        let (next, created) = week_store::add_event(self.weeks(), week_id, now_ms);
        let event_id = created?;
        self.replace_weeks(next);
        self.editing_event = Some((week_id, event_id));
        Some(event_id)
    }

    pub fn update_event(&mut self, week_id: WeekId, event_id: EventId, text: &str) -> bool {
        let next = week_store::update_event(self.weeks(), week_id, event_id, text);
        self.replace_weeks(next)
    }

    pub fn delete_event(&mut self, week_id: WeekId, event_id: EventId) -> bool {
        let next = week_store::delete_event(self.weeks(), week_id, event_id);
        if self.editing_event == Some((week_id, event_id)) {
            self.editing_event = None;
        }
        self.replace_weeks(next)
    }

    /// Event most recently added and not yet finished, as `(week, event)`.
    pub fn editing_event(&self) -> Option<(WeekId, EventId)> {
        self.editing_event
    }

    pub fn finish_editing_event(&mut self) {
        self.editing_event = None;
    }

    /// Opens a theme draft seeded from the week's current themes.
    ///
    /// Replaces any other open draft. Returns `false` for unknown weeks.
    pub fn start_editing_theme(&mut self, week_id: WeekId) -> bool {
        let Some(week) = self.week(week_id) else {
            return false;
        };
        self.theme_draft = Some(ThemeDraft {
            week_id,
            theme1: week.theme1.clone(),
            theme2: week.theme2.clone(),
        });
        true
    }

    pub fn theme_draft(&self) -> Option<&ThemeDraft> {
        self.theme_draft.as_ref()
    }

    /// Edits the open draft; `false` when no draft is open.
    pub fn set_theme_draft(&mut self, theme1: &str, theme2: &str) -> bool {
        match self.theme_draft.as_mut() {
            Some(draft) => {
                draft.theme1 = theme1.to_string();
                draft.theme2 = theme2.to_string();
                true
            }
            None => false,
        }
    }

    /// Commits the open draft to its week and closes it.
    ///
    /// Returns `false` when no draft was open.
    pub fn finish_editing_theme(&mut self) -> bool {
        let Some(draft) = self.theme_draft.take() else {
            return false;
        };
        self.update_theme(draft.week_id, &draft.theme1, &draft.theme2);
        true
    }

    /// Discards the open draft.
    pub fn cancel_editing_theme(&mut self) {
        self.theme_draft = None;
    }

    /// Writes the week list if the pending write is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<PersistOutcome> {
        let version = self.debouncer.take_due(now)?;
        Some(self.write(version))
    }

    /// Writes any pending change immediately.
    pub fn flush(&mut self) -> Option<PersistOutcome> {
        let version = self.debouncer.take_pending()?;
        Some(self.write(version))
    }

    fn replace_weeks(&mut self, next: Vec<Week>) -> bool {
        if next == self.calendar.weeks {
            return false;
        }
        self.calendar.weeks = next;
        self.version += 1;
        if let Some(replaced) = self.debouncer.schedule(self.version, (self.clock)()) {
            debug!(
                "event=persist_schedule module=session status=rescheduled replaced_version={} version={}",
                replaced.version, self.version
            );
        }
        true
    }

    fn write(&mut self, version: u64) -> PersistOutcome {
        let year = self.calendar.year;
        match self.storage.save(year, &self.calendar.weeks) {
            Ok(()) => {
                self.last_written = Some(version);
                debug!("event=persist_write module=session status=ok year={year} version={version}");
                PersistOutcome::Written { version }
            }
            Err(err) => {
                error!(
                    "event=persist_write module=session status=error year={year} version={version} error={err}"
                );
                PersistOutcome::Failed { version }
            }
        }
    }
}
