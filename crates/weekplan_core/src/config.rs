//! Planner runtime configuration.
//!
//! # Responsibility
//! - Resolve the access password, key prefix, planning year and save delay.
//! - Read values from the process environment with documented defaults.
//!
//! # Invariants
//! - Parsing never panics; malformed values surface as `ConfigError`.

use crate::service::debounce::DEFAULT_SAVE_DELAY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const ENV_PASSWORD: &str = "WEEKPLAN_PASSWORD";
pub const ENV_APP_KEY: &str = "WEEKPLAN_APP_KEY";
pub const ENV_YEAR: &str = "WEEKPLAN_YEAR";
pub const ENV_SAVE_DELAY_MS: &str = "WEEKPLAN_SAVE_DELAY_MS";
pub const ENV_PURGE_YEAR: &str = "WEEKPLAN_PURGE_YEAR";

pub const DEFAULT_PASSWORD: &str = "Bruno";
pub const DEFAULT_APP_KEY: &str = "family-calendar";
pub const DEFAULT_YEAR: i32 = 2026;
pub const DEFAULT_PURGE_YEAR: i32 = 2025;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Configuration error for environment-sourced values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved planner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Shared family password compared on login.
    pub password: String,
    /// Prefix of every persisted key.
    pub app_key: String,
    /// Planning year whose weeks are loaded.
    pub year: i32,
    /// Quiet period before a change is written.
    pub save_delay: Duration,
    /// Year slot removed once by legacy cleanup.
    pub purge_year: Option<i32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            password: DEFAULT_PASSWORD.to_string(),
            app_key: DEFAULT_APP_KEY.to_string(),
            year: DEFAULT_YEAR,
            save_delay: DEFAULT_SAVE_DELAY,
            purge_year: Some(DEFAULT_PURGE_YEAR),
        }
    }
}

impl PlannerConfig {
    /// Builds configuration from `WEEKPLAN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Unset or blank values fall back to defaults. A blank
    /// `WEEKPLAN_PURGE_YEAR` or the value `none` disables purging.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(password) = lookup(ENV_PASSWORD).filter(|value| !value.is_empty()) {
            config.password = password;
        }
        if let Some(app_key) = read(ENV_APP_KEY) {
            config.app_key = app_key;
        }
        if let Some(raw) = read(ENV_YEAR) {
            config.year = parse_year(ENV_YEAR, &raw)?;
        }
        if let Some(raw) = read(ENV_SAVE_DELAY_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SAVE_DELAY_MS,
                value: raw.clone(),
                reason: "expected milliseconds as an unsigned integer",
            })?;
            config.save_delay = Duration::from_millis(millis);
        }
        match lookup(ENV_PURGE_YEAR).map(|value| value.trim().to_string()) {
            None => {}
            Some(raw) if raw.is_empty() || raw.eq_ignore_ascii_case("none") => {
                config.purge_year = None;
            }
            Some(raw) => config.purge_year = Some(parse_year(ENV_PURGE_YEAR, &raw)?),
        }

        Ok(config)
    }
}

fn parse_year(key: &'static str, raw: &str) -> Result<i32, ConfigError> {
    let year = raw.parse::<i32>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: "expected a calendar year",
    })?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "year must be within 1..=9999",
        });
    }
    Ok(year)
}
