//! Typed result of interpreting one inbound message.
//!
//! Constructed fresh per message, immutable, consumed exactly once by the
//! caller. Only the actions a Command triggers persist — never the Command.

use crate::domain::{ClockTime, Weekday};

/// Which reminders a delete targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderSelector {
    ById(i64),
    /// Most recently created reminder.
    Latest,
    All,
    ByKeyword(String),
}

/// Which part of the schedule a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleScope {
    Day(Weekday),
    /// Resolved by the caller against the current date at UTC+7.
    Today,
    All,
}

/// One structured intent, or the decision to hand the text to open chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSchedule {
        day: Weekday,
        time: ClockTime,
        subject: String,
    },
    DeleteScheduleByTime {
        day: Weekday,
        time: ClockTime,
    },
    DeleteScheduleBySubject {
        keyword: String,
    },
    AddReminder {
        duration_secs: u64,
        text: String,
    },
    DeleteReminder {
        selector: ReminderSelector,
    },
    ListSchedule {
        scope: ScheduleScope,
    },
    SearchSchedule {
        keyword: String,
    },
    ListReminders,
    TimeQuery,
    Help,
    /// A payload destined for storage contained a denylisted keyword.
    /// The whole command is refused; the keyword is echoed back.
    Refusal {
        keyword: &'static str,
    },
    /// A legacy fixed-grammar matcher recognized the shape but a value was
    /// out of domain; the message tells the user how to fix it.
    Correction {
        message: String,
    },
    /// No matcher claimed the text; the caller forwards it to the AI backend.
    Unrecognized,
}
