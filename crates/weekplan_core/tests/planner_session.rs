use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use weekplan_core::{
    CalendarStorage, KeyValueStore, LoadSource, MemoryKeyValueStore, PersistOutcome,
    PlannerConfig, PlannerSession, StorageError, StorageKeys, StorageResult,
};

const WEEKS_KEY: &str = "family-calendar-weeks-2026";

/// Memory store that records every value written and can refuse reads
/// or writes.
#[derive(Clone, Default)]
struct RecordingStore {
    inner: MemoryKeyValueStore,
    writes: Rc<RefCell<Vec<(String, String)>>>,
    fail_reads: Rc<Cell<bool>>,
    fail_writes: Rc<Cell<bool>>,
}

fn storage_failure() -> StorageError {
    StorageError::Db(weekplan_core::db::DbError::Sqlite(
        rusqlite::Error::InvalidQuery,
    ))
}

impl RecordingStore {
    fn week_writes(&self) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|(key, _)| key == WEEKS_KEY)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(storage_failure());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(storage_failure());
        }
        self.writes
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

fn config() -> PlannerConfig {
    PlannerConfig {
        save_delay: Duration::from_secs(60),
        ..PlannerConfig::default()
    }
}

fn open(store: &RecordingStore) -> PlannerSession<RecordingStore> {
    let storage = CalendarStorage::new(store.clone(), StorageKeys::new("family-calendar"));
    PlannerSession::open(storage, &config())
}

fn open_with_clock(
    store: &RecordingStore,
    clock: &Rc<Cell<Instant>>,
) -> PlannerSession<RecordingStore> {
    let storage = CalendarStorage::new(store.clone(), StorageKeys::new("family-calendar"));
    let clock = Rc::clone(clock);
    PlannerSession::open_with_clock(storage, &config(), move || clock.get())
}

fn after_delay() -> Instant {
    Instant::now() + config().save_delay
}

#[test]
fn empty_store_generates_default_weeks_without_writing() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    assert_eq!(session.load_source(), LoadSource::Generated);
    assert_eq!(session.weeks().len(), 52);
    assert_eq!(session.version(), 0);
    assert!(session.pending_write().is_none());
    assert_eq!(session.tick(after_delay()), None);
    assert!(store.week_writes().is_empty());
}

#[test]
fn rapid_updates_produce_one_write_with_last_state() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    for label in ["a", "ab", "abc", "abcd", "Focus"] {
        assert!(session.update_theme(1, label, "Health"));
    }
    assert_eq!(session.version(), 5);

    assert_eq!(session.tick(Instant::now()), None);
    assert_eq!(
        session.tick(after_delay()),
        Some(PersistOutcome::Written { version: 5 })
    );
    assert_eq!(session.tick(after_delay()), None);

    let writes = store.week_writes();
    assert_eq!(writes.len(), 1);
    let persisted: serde_json::Value = serde_json::from_str(&writes[0]).unwrap();
    assert_eq!(persisted[0]["theme1"], "Focus");
    assert_eq!(persisted[0]["theme2"], "Health");
}

#[test]
fn each_change_restarts_the_quiet_period() {
    let store = RecordingStore::default();
    let start = Instant::now();
    let clock = Rc::new(Cell::new(start));
    let mut session = open_with_clock(&store, &clock);
    let delay = config().save_delay;

    session.toggle_expanded(4);
    assert_eq!(session.pending_write().unwrap().due_at, start + delay);

    clock.set(start + Duration::from_secs(30));
    session.toggle_expanded(5);
    let second = session.pending_write().unwrap();
    assert_eq!(second.version, 2);
    assert_eq!(second.due_at, start + Duration::from_secs(30) + delay);

    assert_eq!(session.tick(start + delay), None);
    assert_eq!(
        session.tick(second.due_at),
        Some(PersistOutcome::Written { version: 2 })
    );
    assert_eq!(store.week_writes().len(), 1);
}

#[test]
fn no_op_edits_do_not_schedule_writes() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    assert!(!session.update_theme(1, "", ""));
    assert!(!session.toggle_expanded(60));
    assert!(!session.delete_event(1, 12345));
    assert_eq!(session.version(), 0);
    assert!(session.pending_write().is_none());
}

#[test]
fn themes_survive_reload() {
    let store = RecordingStore::default();
    let mut session = open(&store);
    session.update_theme(1, "Focus", "Health");
    session.tick(after_delay());
    drop(session);

    let reloaded = open(&store);
    assert_eq!(reloaded.load_source(), LoadSource::Persisted);
    let week = reloaded.week(1).unwrap();
    assert_eq!(week.theme1, "Focus");
    assert_eq!(week.theme2, "Health");
    assert_eq!(week.date_range, "Jan 5 - Jan 11");
}

#[test]
fn unreadable_storage_falls_back_to_defaults() {
    let store = RecordingStore::default();
    store.inner.set(WEEKS_KEY, "[{\"id\": \"x\"}]").unwrap();

    let session = open(&store);
    assert_eq!(session.load_source(), LoadSource::Recovered);
    assert_eq!(session.weeks().len(), 52);
    assert_eq!(session.weeks()[0].date_range, "Jan 5 - Jan 11");
}

#[test]
fn failed_storage_read_falls_back_to_defaults() {
    let store = RecordingStore::default();
    store.inner.set(WEEKS_KEY, "[]").unwrap();
    store.fail_reads.set(true);

    let mut session = open(&store);
    assert_eq!(session.load_source(), LoadSource::Recovered);
    assert_eq!(session.weeks().len(), 52);
    assert_eq!(session.week(1).unwrap().date_range, "Jan 5 - Jan 11");

    store.fail_reads.set(false);
    session.update_theme(1, "Focus", "");
    assert_eq!(session.flush(), Some(PersistOutcome::Written { version: 1 }));
}

#[test]
fn partial_legacy_list_is_completed_to_the_full_year() {
    let store = RecordingStore::default();
    store
        .inner
        .set("family-calendar-weeks", "[{\"id\": 1, \"theme\": \"Old\"}]")
        .unwrap();

    let session = open(&store);
    assert_eq!(session.load_source(), LoadSource::Persisted);
    assert_eq!(session.weeks().len(), 52);
    assert!(session.weeks().iter().map(|week| week.id).eq(1..=52));
    assert!(session.weeks().iter().all(|week| !week.date_range.is_empty()));

    let first = session.week(1).unwrap();
    assert_eq!(first.theme1, "Old");
    assert_eq!(first.date_range, "Jan 5 - Jan 11");
    assert_eq!(session.week(52).unwrap().date_range, "Dec 28 - Jan 3");
    assert_eq!(session.version(), 0);
    assert!(session.pending_write().is_none());
}

#[test]
fn write_failures_are_swallowed_and_not_retried() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    store.fail_writes.set(true);
    session.update_theme(2, "Travel", "");
    assert_eq!(
        session.tick(after_delay()),
        Some(PersistOutcome::Failed { version: 1 })
    );
    assert!(session.pending_write().is_none());
    assert_eq!(session.week(2).unwrap().theme1, "Travel");
    assert_eq!(session.last_written_version(), None);

    store.fail_writes.set(false);
    session.update_event(2, 1, "ignored");
    assert_eq!(session.flush(), None);

    session.toggle_expanded(2);
    assert_eq!(session.flush(), Some(PersistOutcome::Written { version: 2 }));
    assert_eq!(session.last_written_version(), Some(2));
}

#[test]
fn theme_editing_lifecycle_commits_or_discards_draft() {
    let store = RecordingStore::default();
    let mut session = open(&store);
    session.update_theme(3, "Old", "Pair");

    assert!(session.start_editing_theme(3));
    let draft = session.theme_draft().unwrap();
    assert_eq!((draft.theme1.as_str(), draft.theme2.as_str()), ("Old", "Pair"));

    assert!(session.set_theme_draft("New", ""));
    session.cancel_editing_theme();
    assert!(session.theme_draft().is_none());
    assert_eq!(session.week(3).unwrap().theme1, "Old");

    assert!(session.start_editing_theme(3));
    session.set_theme_draft("New", "");
    assert!(session.finish_editing_theme());
    assert!(!session.finish_editing_theme());
    let week = session.week(3).unwrap();
    assert_eq!((week.theme1.as_str(), week.theme2.as_str()), ("New", ""));

    assert!(!session.start_editing_theme(0));
    assert!(!session.set_theme_draft("x", "y"));
}

#[test]
fn starting_another_theme_edit_replaces_the_draft() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    session.start_editing_theme(1);
    session.set_theme_draft("Unsaved", "");
    session.start_editing_theme(2);
    session.finish_editing_theme();

    assert_eq!(session.week(1).unwrap().theme1, "");
    assert_eq!(session.week(2).unwrap().theme1, "");
    assert_eq!(session.version(), 0);
}

#[test]
fn added_event_is_tracked_for_editing_until_finished_or_deleted() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    let event_id = session.add_event_at(7, 1_000).unwrap();
    assert_eq!(session.editing_event(), Some((7, event_id)));
    assert!(session.week(7).unwrap().expanded);

    assert!(session.update_event(7, event_id, "Parent evening"));
    session.finish_editing_event();
    assert_eq!(session.editing_event(), None);

    let second = session.add_event_at(7, 1_000).unwrap();
    assert_eq!(second, event_id + 1);
    assert!(session.delete_event(7, second));
    assert_eq!(session.editing_event(), None);
    assert_eq!(session.add_event_at(99, 1_000), None);

    let events = &session.week(7).unwrap().events;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text, "Parent evening");
}

#[test]
fn wall_clock_event_ids_are_unique_within_a_week() {
    let store = RecordingStore::default();
    let mut session = open(&store);

    let ids: Vec<_> = (0..5).map(|_| session.add_event(1).unwrap()).collect();
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}
