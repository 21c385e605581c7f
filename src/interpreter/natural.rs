//! Natural-language intent matchers. Looser phrasing, tried first.
//!
//! Each matcher is a pure function over the original un-normalized input;
//! matchers share no mutated state. A precondition miss is a silent
//! NoMatch so a lower-priority matcher (or the chat fallback) can try.

use crate::domain::{Command, ReminderSelector};
use crate::interpreter::{extract, guard, normalize, MatchOutcome, Matcher};
use regex::Regex;
use std::sync::OnceLock;

fn reminder_trigger_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:ingatkan|reminder|remind|ingat|ingetin)\b\s*")
            .expect("reminder trigger regex")
    })
}

fn delete_reminder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:hapus|delete|remove|clear)\b.*\b(?:reminder|reminders)\b")
            .expect("delete reminder regex")
    })
}

fn delete_reminder_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:hapus|delete|remove|clear)\s+(?:semua\s+)?(?:reminders|reminder)\s*")
            .expect("delete reminder strip regex")
    })
}

fn all_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:semua|all)\b").expect("all token regex"))
}

fn latest_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:terbaru|latest|terakhir)\b").expect("latest token regex")
    })
}

fn add_schedule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:tambah|tambahkan|add)\b.*\b(?:jadwal|schedule)\b")
            .expect("add schedule regex")
    })
}

fn add_schedule_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:tambah|tambahkan|add)\s+(?:jadwal|schedule)\s*")
            .expect("add schedule strip regex")
    })
}

fn delete_schedule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:hapus|delete|remove|clear)\b.*\b(?:jadwal|schedule)\b")
            .expect("delete schedule regex")
    })
}

fn delete_schedule_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:hapus|delete|remove|clear)\s+(?:jadwal|schedule)\s*")
            .expect("delete schedule strip regex")
    })
}

/// "ingatkan aku dalam 5 menit untuk belajar" and friends.
pub struct AddReminderNatural;

impl Matcher for AddReminderNatural {
    fn name(&self) -> &'static str {
        "add_reminder_natural"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if !reminder_trigger_re().is_match(text) {
            return MatchOutcome::NoMatch;
        }
        let stripped = reminder_trigger_re().replace_all(text, "");
        let Some(duration_secs) = extract::extract_duration(&stripped) else {
            return MatchOutcome::NoMatch;
        };
        let remainder = normalize::tidy(&normalize::strip_duration(&stripped));
        if remainder.is_empty() {
            return MatchOutcome::NoMatch;
        }
        if let Some(keyword) = guard::check(&remainder) {
            return MatchOutcome::Matched(Command::Refusal { keyword });
        }
        MatchOutcome::Matched(Command::AddReminder {
            duration_secs,
            text: remainder,
        })
    }
}

/// "hapus reminder belajar" / "hapus semua reminder" / "hapus reminder terbaru".
pub struct DeleteReminderNatural;

impl Matcher for DeleteReminderNatural {
    fn name(&self) -> &'static str {
        "delete_reminder_natural"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if !delete_reminder_re().is_match(text) {
            return MatchOutcome::NoMatch;
        }
        // "semua" is checked against the ORIGINAL text: stripping removes
        // the "semua" sandwiched between trigger and "reminder".
        if all_token_re().is_match(text) {
            return MatchOutcome::Matched(Command::DeleteReminder {
                selector: ReminderSelector::All,
            });
        }
        let stripped = delete_reminder_strip_re().replace_all(text, "");
        if latest_token_re().is_match(&stripped) {
            return MatchOutcome::Matched(Command::DeleteReminder {
                selector: ReminderSelector::Latest,
            });
        }
        let remainder = normalize::tidy(&stripped);
        if remainder.is_empty() {
            return MatchOutcome::NoMatch;
        }
        MatchOutcome::Matched(Command::DeleteReminder {
            selector: ReminderSelector::ByKeyword(remainder),
        })
    }
}

/// "tambahkan jadwal senin jam 08:00 kuliah AI" and friends.
pub struct AddScheduleNatural;

impl Matcher for AddScheduleNatural {
    fn name(&self) -> &'static str {
        "add_schedule_natural"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if !add_schedule_re().is_match(text) {
            return MatchOutcome::NoMatch;
        }
        let stripped = add_schedule_strip_re().replace_all(text, "");
        let Some(day) = extract::extract_weekday(&stripped) else {
            return MatchOutcome::NoMatch;
        };
        let Some(time) = extract::extract_clock_time(&stripped) else {
            return MatchOutcome::NoMatch;
        };
        let subject =
            normalize::tidy(&normalize::strip_times(&normalize::strip_weekdays(&stripped)));
        if subject.is_empty() {
            return MatchOutcome::NoMatch;
        }
        if let Some(keyword) = guard::check(&subject) {
            return MatchOutcome::Matched(Command::Refusal { keyword });
        }
        MatchOutcome::Matched(Command::AddSchedule { day, time, subject })
    }
}

/// "hapus jadwal senin jam 08:00". The caller resolves the exact entry
/// against the store for that day before deleting.
pub struct DeleteScheduleNatural;

impl Matcher for DeleteScheduleNatural {
    fn name(&self) -> &'static str {
        "delete_schedule_natural"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if !delete_schedule_re().is_match(text) {
            return MatchOutcome::NoMatch;
        }
        let stripped = delete_schedule_strip_re().replace_all(text, "");
        let Some(day) = extract::extract_weekday(&stripped) else {
            return MatchOutcome::NoMatch;
        };
        let Some(time) = extract::extract_clock_time(&stripped) else {
            return MatchOutcome::NoMatch;
        };
        MatchOutcome::Matched(Command::DeleteScheduleByTime { day, time })
    }
}
