//! Week planner domain model.
//!
//! # Responsibility
//! - Define the week/event/calendar records shared by storage and session.
//! - Derive calendar dates (first Monday, display ranges) for a year.
//!
//! # Invariants
//! - A generated year has exactly 52 weeks with ids `1..=52`.
//! - Event ids are unique within their owning week.

pub mod schedule;
pub mod week;
