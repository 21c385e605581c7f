//! Legacy fixed-grammar matchers. Stricter regexes anchored at
//! start-of-line, kept for compatibility with phrasings that predate the
//! natural-language layer. Tried after every natural matcher.
//!
//! Unlike the natural layer, these surface an explicit correction message
//! when a value is out of domain.

use crate::domain::{Command, ReminderSelector, ScheduleScope};
use crate::interpreter::{extract, guard, normalize, MatchOutcome, Matcher};
use regex::Regex;
use std::sync::OnceLock;

fn jadwal_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^jadwal\s+(.+)$").expect("jadwal line regex"))
}

fn list_all_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:lihat\s+|tampilkan\s+|list\s+)?(?:semua\s+jadwal|jadwal\s+semua|all\s+schedules?)\s*$")
            .expect("list all regex")
    })
}

fn query_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:cari\s+|cek\s+|lihat\s+|list\s+)?jadwal(?:\s+(.+))?$")
            .expect("schedule query regex")
    })
}

fn delete_subject_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^hapus\s+jadwal\s+(.+)$").expect("delete subject regex")
    })
}

fn shorthand_reminder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:ingatkan|reminder|remind|ingetin)\s+(\S+)\s+(.+)$")
            .expect("shorthand reminder regex")
    })
}

fn list_reminders_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:lihat\s+|cek\s+|list\s+|daftar\s+)?(?:reminder(?:s|ku)?|pengingat)\s*$")
            .expect("list reminders regex")
    })
}

fn reset_reminders_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:reset|bersihkan)\s+(?:semua\s+)?(?:reminder(?:s|ku)?|pengingat)\s*$")
            .expect("reset reminders regex")
    })
}

fn time_query_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:jam\s+berapa(?:\s+sekarang)?|sekarang\s+jam\s+berapa|what\s+time(?:\s+is\s+it)?)\s*\??\s*$",
        )
        .expect("time query regex")
    })
}

fn help_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:help|bantuan|menu|perintah|commands?)\s*$").expect("help regex")
    })
}

/// `jadwal <hari> <jam> <matkul>` — the pre-natural-language add form.
/// Day without time falls through to the query matcher below.
pub struct LegacyAddSchedule;

impl Matcher for LegacyAddSchedule {
    fn name(&self) -> &'static str {
        "legacy_add_schedule"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        let Some(caps) = jadwal_line_re().captures(text) else {
            return MatchOutcome::NoMatch;
        };
        let rest = &caps[1];
        let Some(day) = extract::extract_weekday(rest) else {
            return MatchOutcome::NoMatch;
        };
        let Some(time) = extract::extract_clock_time(rest) else {
            if extract::has_time_shape(rest) {
                return MatchOutcome::Rejected(
                    "❌ Jam tidak valid. Gunakan 00:00 sampai 23:59.".to_string(),
                );
            }
            return MatchOutcome::NoMatch;
        };
        let subject = normalize::tidy(&normalize::strip_times(&normalize::strip_weekdays(rest)));
        if subject.is_empty() {
            return MatchOutcome::Rejected(
                "❌ Mata kuliah tidak boleh kosong. Contoh: jadwal senin jam 08:00 kuliah AI"
                    .to_string(),
            );
        }
        if let Some(keyword) = guard::check(&subject) {
            return MatchOutcome::Matched(Command::Refusal { keyword });
        }
        MatchOutcome::Matched(Command::AddSchedule { day, time, subject })
    }
}

/// "semua jadwal" / "jadwal semua" / "all schedules".
pub struct LegacyListAllSchedules;

impl Matcher for LegacyListAllSchedules {
    fn name(&self) -> &'static str {
        "legacy_list_all_schedules"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if list_all_re().is_match(text) {
            MatchOutcome::Matched(Command::ListSchedule {
                scope: ScheduleScope::All,
            })
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// `jadwal [hari|hari ini|<kata kunci>]` — list by day, list today, or
/// search by subject substring. Bare "jadwal" means today.
pub struct LegacyScheduleQuery;

impl Matcher for LegacyScheduleQuery {
    fn name(&self) -> &'static str {
        "legacy_schedule_query"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        let Some(caps) = query_re().captures(text) else {
            return MatchOutcome::NoMatch;
        };
        let arg = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if arg.is_empty() || arg.eq_ignore_ascii_case("hari ini") || arg.eq_ignore_ascii_case("today")
        {
            return MatchOutcome::Matched(Command::ListSchedule {
                scope: ScheduleScope::Today,
            });
        }
        // A single day token lists that day; anything else is a subject search.
        if arg.split_whitespace().count() == 1 {
            if let Some(day) = extract::extract_weekday(arg) {
                return MatchOutcome::Matched(Command::ListSchedule {
                    scope: ScheduleScope::Day(day),
                });
            }
        }
        MatchOutcome::Matched(Command::SearchSchedule {
            keyword: arg.to_string(),
        })
    }
}

/// `hapus jadwal <kata kunci>` — deletes every entry whose subject
/// contains the keyword. Day+time forms are claimed earlier by the
/// natural delete matcher.
pub struct LegacyDeleteScheduleBySubject;

impl Matcher for LegacyDeleteScheduleBySubject {
    fn name(&self) -> &'static str {
        "legacy_delete_schedule_by_subject"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        let Some(caps) = delete_subject_re().captures(text) else {
            return MatchOutcome::NoMatch;
        };
        let keyword = caps[1].trim().to_string();
        if keyword.is_empty() {
            return MatchOutcome::NoMatch;
        }
        MatchOutcome::Matched(Command::DeleteScheduleBySubject { keyword })
    }
}

/// `reminder 1h30m <pesan>` — shorthand duration token form.
pub struct LegacyAddReminderShorthand;

impl Matcher for LegacyAddReminderShorthand {
    fn name(&self) -> &'static str {
        "legacy_add_reminder_shorthand"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        let Some(caps) = shorthand_reminder_re().captures(text) else {
            return MatchOutcome::NoMatch;
        };
        let token = &caps[1];
        if !extract::is_shorthand_token(token) {
            return MatchOutcome::NoMatch;
        }
        let duration_secs = extract::shorthand_duration(token);
        if duration_secs == 0 {
            return MatchOutcome::Rejected(
                "❌ Format waktu salah. Gunakan 1d, 2h, 30m, 15s (contoh: 1h30m).".to_string(),
            );
        }
        let message = normalize::tidy(&caps[2]);
        if message.is_empty() {
            return MatchOutcome::Rejected("❌ Pesan reminder tidak boleh kosong.".to_string());
        }
        if let Some(keyword) = guard::check(&message) {
            return MatchOutcome::Matched(Command::Refusal { keyword });
        }
        MatchOutcome::Matched(Command::AddReminder {
            duration_secs,
            text: message,
        })
    }
}

/// "reminder" / "lihat reminderku" / "daftar pengingat".
pub struct LegacyListReminders;

impl Matcher for LegacyListReminders {
    fn name(&self) -> &'static str {
        "legacy_list_reminders"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if list_reminders_re().is_match(text) {
            MatchOutcome::Matched(Command::ListReminders)
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// "reset reminder" — wipes every reminder the user owns.
pub struct LegacyDeleteAllReminders;

impl Matcher for LegacyDeleteAllReminders {
    fn name(&self) -> &'static str {
        "legacy_delete_all_reminders"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if reset_reminders_re().is_match(text) {
            MatchOutcome::Matched(Command::DeleteReminder {
                selector: ReminderSelector::All,
            })
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// "jam berapa" / "what time is it".
pub struct LegacyTimeQuery;

impl Matcher for LegacyTimeQuery {
    fn name(&self) -> &'static str {
        "legacy_time_query"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if time_query_re().is_match(text) {
            MatchOutcome::Matched(Command::TimeQuery)
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// "help" / "bantuan" / "menu".
pub struct LegacyHelp;

impl Matcher for LegacyHelp {
    fn name(&self) -> &'static str {
        "legacy_help"
    }

    fn try_match(&self, text: &str) -> MatchOutcome {
        if help_re().is_match(text) {
            MatchOutcome::Matched(Command::Help)
        } else {
            MatchOutcome::NoMatch
        }
    }
}
