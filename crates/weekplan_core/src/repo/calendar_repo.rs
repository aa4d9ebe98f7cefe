//! Year-scoped calendar storage adapter.
//!
//! # Responsibility
//! - Read and write the full week list of one year under
//!   `<app>-weeks-<year>`.
//! - Run the one-time relocation of legacy un-scoped data.
//!
//! # Invariants
//! - Writes validate the week list before touching storage.
//! - Reads upgrade legacy record shapes via `week_schema`.
//! - Legacy cleanup runs at most once per store, guarded by
//!   `<app>-cleanup-done`.

use crate::model::week::{validate_weeks, Calendar, Week};
use crate::repo::kv_store::{KeyValueStore, StorageResult};
use crate::repo::week_schema::migrate_week_list;
use log::{debug, info};

const FLAG_TRUE: &str = "true";

/// Persisted key layout derived from an application prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    app_key: String,
}

impl StorageKeys {
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
        }
    }

    /// `<app>-auth`
    pub fn auth(&self) -> String {
        format!("{}-auth", self.app_key)
    }

    /// `<app>-weeks-<year>`
    pub fn weeks(&self, year: i32) -> String {
        format!("{}-weeks-{year}", self.app_key)
    }

    /// Legacy un-scoped `<app>-weeks`.
    pub fn legacy_weeks(&self) -> String {
        format!("{}-weeks", self.app_key)
    }

    /// `<app>-cleanup-done`
    pub fn cleanup_done(&self) -> String {
        format!("{}-cleanup-done", self.app_key)
    }
}

/// Result of one `run_legacy_cleanup` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Guard flag was already set; storage untouched.
    AlreadyDone,
    Applied {
        /// Legacy data was copied into the year slot.
        moved_legacy: bool,
        /// Year slot that was removed, if any.
        purged_year: Option<i32>,
    },
}

/// Calendar persistence over any key/value store.
#[derive(Debug, Clone)]
pub struct CalendarStorage<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> CalendarStorage<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// Loads the calendar of `year`.
    ///
    /// Returns a calendar with an empty week list when nothing is stored.
    ///
    /// # Errors
    /// - Storage transport failures.
    /// - Malformed JSON, undecodable records or invalid week structure.
    pub fn load(&self, year: i32) -> StorageResult<Calendar> {
        let Some(raw) = self.store.get(&self.keys.weeks(year))? else {
            debug!("event=calendar_load module=storage status=empty year={year}");
            return Ok(Calendar::new(year, Vec::new()));
        };

        let weeks = migrate_week_list(&raw, year)?;
        validate_weeks(&weeks)?;
        debug!(
            "event=calendar_load module=storage status=ok year={year} weeks={}",
            weeks.len()
        );
        Ok(Calendar::new(year, weeks))
    }

    /// Replaces the persisted week list of `year`.
    pub fn save(&self, year: i32, weeks: &[Week]) -> StorageResult<()> {
        validate_weeks(weeks)?;
        let encoded = serde_json::to_string(weeks)?;
        self.store.set(&self.keys.weeks(year), &encoded)?;
        debug!(
            "event=calendar_save module=storage status=ok year={year} weeks={} bytes={}",
            weeks.len(),
            encoded.len()
        );
        Ok(())
    }

    /// Relocates legacy un-scoped data into `year` and purges `purge_year`.
    ///
    /// Legacy data only fills an empty year slot; an existing year slot
    /// wins. The legacy key is removed in both cases. `purge_year` equal to
    /// `year` is ignored.
    pub fn run_legacy_cleanup(
        &self,
        year: i32,
        purge_year: Option<i32>,
    ) -> StorageResult<CleanupOutcome> {
        let guard_key = self.keys.cleanup_done();
        if self.store.get(&guard_key)?.as_deref() == Some(FLAG_TRUE) {
            return Ok(CleanupOutcome::AlreadyDone);
        }

        let legacy_key = self.keys.legacy_weeks();
        let year_key = self.keys.weeks(year);
        let mut moved_legacy = false;
        if let Some(legacy) = self.store.get(&legacy_key)? {
            if self.store.get(&year_key)?.is_none() {
                self.store.set(&year_key, &legacy)?;
                moved_legacy = true;
            }
            self.store.remove(&legacy_key)?;
        }

        let purged_year = purge_year.filter(|purged| *purged != year);
        if let Some(purged) = purged_year {
            self.store.remove(&self.keys.weeks(purged))?;
        }

        self.store.set(&guard_key, FLAG_TRUE)?;
        info!(
            "event=legacy_cleanup module=storage status=ok year={year} moved_legacy={moved_legacy} purged_year={}",
            purged_year.map_or_else(|| "none".to_string(), |y| y.to_string())
        );

        Ok(CleanupOutcome::Applied {
            moved_legacy,
            purged_year,
        })
    }
}
