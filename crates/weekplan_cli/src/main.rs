//! CLI smoke entry point for the weekly planner core.
//!
//! # Responsibility
//! - Wire config, logging and a file-backed store the way an embedding UI
//!   would.
//! - Print a deterministic plain-text summary of the planner year.
//!
//! Usage: `weekplan_cli [password]`. `WEEKPLAN_DB_PATH` selects the store
//! file (in-memory when unset); `WEEKPLAN_LOG_DIR` enables file logging.

use log::warn;
use std::process::ExitCode;
use weekplan_core::db::{open_db, open_db_in_memory};
use weekplan_core::{
    default_log_level, init_logging, LoadSource, PlannerApp, PlannerConfig, SqliteKeyValueStore,
};

const ENV_DB_PATH: &str = "WEEKPLAN_DB_PATH";
const ENV_LOG_DIR: &str = "WEEKPLAN_LOG_DIR";
const ENV_LOG_LEVEL: &str = "WEEKPLAN_LOG_LEVEL";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, String> {
    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        let level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| default_log_level().into());
        init_logging(&level, &log_dir).map_err(|err| err.to_string())?;
    }

    let config = PlannerConfig::from_env().map_err(|err| err.to_string())?;
    let conn = match std::env::var(ENV_DB_PATH) {
        Ok(path) => open_db(path),
        Err(_) => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let mut app = PlannerApp::new(config, SqliteKeyValueStore::new(&conn));
    println!("weekplan_core version={}", weekplan_core::core_version());

    if !app.is_unlocked() {
        let Some(password) = std::env::args().nth(1) else {
            println!("planner locked; pass the family password as the first argument");
            return Ok(ExitCode::from(2));
        };
        app.set_password_input(password);
        if let Err(err) = app.submit_login() {
            println!("{err}");
            return Ok(ExitCode::from(2));
        }
    }

    let Some(session) = app.session() else {
        return Err("planner session unavailable after login".to_string());
    };
    println!(
        "{} {} ({:?})",
        session.calendar().name,
        session.year(),
        session.load_source()
    );
    for week in session.weeks() {
        println!(
            "W{:<3} {:<16} {:<30} events={}",
            week.id,
            week.date_range,
            week.theme_label(),
            week.events.len()
        );
    }
    if session.load_source() == LoadSource::Recovered {
        warn!("event=cli_summary module=cli status=recovered year={}", session.year());
    }

    Ok(ExitCode::SUCCESS)
}
