//! Slot normalizer. Strips matched fragments from the input so the text
//! that is left over becomes the free-text payload (reminder message or
//! schedule subject).

use regex::Regex;
use std::sync::OnceLock;

/// Connector words dropped from the front of a remainder, repeatedly.
const CONNECTORS: &[&str] = &["untuk", "apa", "aku", "saya"];

fn duration_phrase_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:dalam\s+)?\d+\s*(?:menit|jam|hari|detik|m|h|d|s)\b")
            .expect("duration phrase regex")
    })
}

fn day_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:senin|selasa|rabu|kamis|jumat|sabtu|minggu|monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tue|wed|thu|fri|sat|sun)\b",
        )
        .expect("day token regex")
    })
}

fn time_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:jam|pukul)?\s*\d{1,2}:\d{2}").expect("time token regex")
    })
}

/// Delete every duration phrase, including an optional leading "dalam".
pub fn strip_duration(text: &str) -> String {
    duration_phrase_re().replace_all(text, " ").into_owned()
}

/// Delete every day-name token (any alias).
pub fn strip_weekdays(text: &str) -> String {
    day_token_re().replace_all(text, " ").into_owned()
}

/// Delete every time token, marker word included.
pub fn strip_times(text: &str) -> String {
    time_token_re().replace_all(text, " ").into_owned()
}

/// Collapse whitespace and drop leading connector words. The result is the
/// remainder; an empty remainder means the owning matcher must fail the
/// whole match, never accept an empty payload.
pub fn tidy(text: &str) -> String {
    let mut words = text.split_whitespace().peekable();
    while let Some(w) = words.peek() {
        if CONNECTORS.contains(&w.to_lowercase().as_str()) {
            words.next();
        } else {
            break;
        }
    }
    words.collect::<Vec<_>>().join(" ")
}
