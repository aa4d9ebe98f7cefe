//! Planner use-case services.
//!
//! # Responsibility
//! - Pure week/event list operations.
//! - Session state, debounced persistence and the password gate.
//!
//! # Invariants
//! - Services never touch SQL or raw JSON; storage goes through `repo`.

pub mod app;
pub mod auth;
pub mod debounce;
pub mod session;
pub mod week_store;
