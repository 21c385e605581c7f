//! The intent-extraction and slot-parsing engine.
//!
//! Layered matchers recognize trigger phrases, pull out a day-of-week, a
//! clock time, a duration, and a free-text payload, and normalize them
//! into typed, validated commands. All recognition is deterministic and
//! pattern-based; interpretation needs no I/O, no locking, and is safe to
//! call concurrently.

pub mod extract;
pub mod guard;
pub mod legacy;
pub mod natural;
pub mod normalize;

use crate::domain::Command;
use tracing::debug;

/// Result of probing one matcher against one input line.
pub enum MatchOutcome {
    /// Preconditions met, command fully populated.
    Matched(Command),
    /// Structurally matched but a value was out of domain; the message is
    /// surfaced to the user. Only legacy matchers produce this; the
    /// natural layer falls through to the next matcher instead.
    Rejected(String),
    /// Preconditions unmet; the dispatcher moves on.
    NoMatch,
}

/// One intent's grammar and slot requirements.
pub trait Matcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn try_match(&self, text: &str) -> MatchOutcome;
}

/// Runs matchers in fixed priority order against one input line,
/// short-circuiting on first success. More specific/structured phrasing is
/// recognized before looser free-chat fallback; the order is data, not
/// control flow, so matchers can be added or reordered in one place.
pub struct Interpreter {
    matchers: Vec<Box<dyn Matcher>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(natural::AddReminderNatural),
            Box::new(natural::DeleteReminderNatural),
            Box::new(natural::AddScheduleNatural),
            Box::new(natural::DeleteScheduleNatural),
            Box::new(legacy::LegacyAddSchedule),
            Box::new(legacy::LegacyListAllSchedules),
            Box::new(legacy::LegacyScheduleQuery),
            Box::new(legacy::LegacyDeleteScheduleBySubject),
            Box::new(legacy::LegacyAddReminderShorthand),
            Box::new(legacy::LegacyListReminders),
            Box::new(legacy::LegacyDeleteAllReminders),
            Box::new(legacy::LegacyTimeQuery),
            Box::new(legacy::LegacyHelp),
        ])
    }

    pub fn with_matchers(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Interpret one complete inbound message. Pure: the same text always
    /// yields a structurally identical Command.
    pub fn interpret(&self, text: &str) -> Command {
        let text = text.trim();
        if text.is_empty() {
            return Command::Unrecognized;
        }
        for matcher in &self.matchers {
            match matcher.try_match(text) {
                MatchOutcome::Matched(cmd) => {
                    debug!(matcher = matcher.name(), "intent matched");
                    return cmd;
                }
                MatchOutcome::Rejected(message) => {
                    debug!(matcher = matcher.name(), "validation rejected");
                    return Command::Correction { message };
                }
                MatchOutcome::NoMatch => {}
            }
        }
        Command::Unrecognized
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
