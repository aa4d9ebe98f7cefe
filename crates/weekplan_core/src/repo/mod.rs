//! Persistence layer for planner data.
//!
//! # Responsibility
//! - Define the key/value storage contract and its SQLite implementation.
//! - Encode, decode and migrate year-scoped week lists.
//!
//! # Invariants
//! - Service code never touches SQL or raw JSON directly.

pub mod calendar_repo;
pub mod kv_store;
pub mod week_schema;
