//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod command;
pub mod entities;
pub mod errors;

pub use command::{Command, ReminderSelector, ScheduleScope};
pub use entities::{ClockTime, ReminderEntry, ScheduleEntry, Weekday};
pub use errors::DomainError;
