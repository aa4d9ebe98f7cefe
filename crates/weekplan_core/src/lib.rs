//! Core state and persistence for the family weekly planner.
//! This crate is the single source of truth for week/event invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::schedule::{first_monday, format_date_range, week_date_range};
pub use model::week::{
    validate_weeks, Calendar, Event, EventId, Week, WeekId, WeekValidationError, WEEKS_PER_YEAR,
};
pub use repo::calendar_repo::{CalendarStorage, CleanupOutcome, StorageKeys};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use repo::week_schema::{migrate_week_record, MigrationError, WeekSchemaVersion};
pub use service::app::{LoginForm, PlannerApp};
pub use service::auth::{AuthError, AuthGate, AuthResult, INCORRECT_PASSWORD_MESSAGE};
pub use service::debounce::{PendingWrite, PersistDebouncer, DEFAULT_SAVE_DELAY};
pub use service::session::{
    LoadSource, PersistOutcome, PlannerSession, SessionClock, ThemeDraft,
};
pub use service::week_store::{
    add_event, complete_year, delete_event, initialize_weeks, toggle_expanded, update_event,
    update_theme,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
