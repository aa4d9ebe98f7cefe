//! Persisted week record schema versions and read-time migration.
//!
//! # Responsibility
//! - Detect which schema a stored week record was written with.
//! - Upgrade records to the current dual-theme layout in one place.
//!
//! # Invariants
//! - Migrating an already-current record is the identity.
//! - A v1 record's `theme` becomes `theme1`; `theme2` starts empty.

use crate::model::week::Week;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema generations of a persisted week record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WeekSchemaVersion {
    /// Single free-text `theme` field.
    V1SingleTheme,
    /// `theme1` + `theme2` fields.
    V2DualTheme,
}

/// Failure to decode or upgrade one persisted week record.
#[derive(Debug)]
pub enum MigrationError {
    NotAnObject,
    Decode(serde_json::Error),
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "persisted week record is not a JSON object"),
            Self::Decode(err) => write!(f, "persisted week record cannot be decoded: {err}"),
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAnObject => None,
            Self::Decode(err) => Some(err),
        }
    }
}

/// Detects the schema version of one raw week record.
pub fn detect_schema_version(record: &Map<String, Value>) -> WeekSchemaVersion {
    if record.contains_key("theme") && !record.contains_key("theme1") {
        WeekSchemaVersion::V1SingleTheme
    } else {
        WeekSchemaVersion::V2DualTheme
    }
}

/// Upgrades one raw week record to the current schema and decodes it.
///
/// Missing `year` is filled with `default_year`; null theme slots become
/// empty strings.
///
/// # Errors
/// - `NotAnObject` when `value` is not a JSON object.
/// - `Decode` when required fields (`id`) are missing or mistyped.
pub fn migrate_week_record(mut value: Value, default_year: i32) -> Result<Week, MigrationError> {
    let record = value.as_object_mut().ok_or(MigrationError::NotAnObject)?;

    if detect_schema_version(record) == WeekSchemaVersion::V1SingleTheme {
        let theme = record
            .remove("theme")
            .and_then(|theme| theme.as_str().map(str::to_owned))
            .unwrap_or_default();
        record.insert("theme1".to_string(), Value::String(theme));
        record.insert("theme2".to_string(), Value::String(String::new()));
    } else {
        record.remove("theme");
    }

    for slot in ["theme1", "theme2"] {
        if record.get(slot).is_some_and(Value::is_null) {
            record.insert(slot.to_string(), Value::String(String::new()));
        }
    }
    record
        .entry("year")
        .or_insert_with(|| Value::from(default_year));

    serde_json::from_value(value).map_err(MigrationError::Decode)
}

/// Upgrades and decodes a persisted JSON array of week records.
pub fn migrate_week_list(raw: &str, default_year: i32) -> Result<Vec<Week>, MigrationError> {
    let records: Vec<Value> = serde_json::from_str(raw).map_err(MigrationError::Decode)?;
    records
        .into_iter()
        .map(|record| migrate_week_record(record, default_year))
        .collect()
}
