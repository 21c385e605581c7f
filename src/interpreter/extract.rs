//! Primitive extractors. Each pulls one typed value out of an arbitrary
//! text fragment, independent of which intent is being matched.

use crate::domain::{ClockTime, Weekday};
use regex::Regex;
use std::sync::OnceLock;

pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3600;
pub const SECS_PER_DAY: u64 = 86400;

/// `<integer><unit>` with unit aliases in both languages. Word-bounded on
/// both sides so shorthand runs like "1h30m" never partially match here;
/// those belong to the legacy shorthand grammar.
fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d+)\s*(menit|jam|hari|detik|m|h|d|s)\b").expect("duration regex")
    })
}

/// Bare `<int><letter>` runs for the legacy "1h30m" token form.
fn shorthand_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)([dhms])").expect("shorthand regex"))
}

fn shorthand_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:\d+[dhms])+$").expect("shorthand token regex"))
}

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:jam|pukul)?\s*(\d{1,2}):(\d{2})").expect("clock regex")
    })
}

/// Alias tables probed in fixed Monday..Sunday order. When a text mentions
/// two day names the earliest-in-table one wins, not the earliest-in-text.
fn day_res() -> &'static Vec<(Weekday, Regex)> {
    static RES: OnceLock<Vec<(Weekday, Regex)>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            (Weekday::Monday, r"(?i)\b(?:senin|monday|mon)\b"),
            (Weekday::Tuesday, r"(?i)\b(?:selasa|tuesday|tue)\b"),
            (Weekday::Wednesday, r"(?i)\b(?:rabu|wednesday|wed)\b"),
            (Weekday::Thursday, r"(?i)\b(?:kamis|thursday|thu)\b"),
            (Weekday::Friday, r"(?i)\b(?:jumat|friday|fri)\b"),
            (Weekday::Saturday, r"(?i)\b(?:sabtu|saturday|sat)\b"),
            (Weekday::Sunday, r"(?i)\b(?:minggu|sunday|sun)\b"),
        ]
        .into_iter()
        .map(|(day, pat)| (day, Regex::new(pat).expect("weekday regex")))
        .collect()
    })
}

fn unit_secs(unit: &str) -> u64 {
    match unit.to_lowercase().as_str() {
        "hari" | "d" => SECS_PER_DAY,
        "jam" | "h" => SECS_PER_HOUR,
        "menit" | "m" => SECS_PER_MINUTE,
        "detik" | "s" => 1,
        _ => 0,
    }
}

/// Scan the whole text for duration tokens and sum them. A sum of zero is
/// never a successful match: it means "no duration found".
pub fn extract_duration(text: &str) -> Option<u64> {
    let mut total: u64 = 0;
    for caps in duration_re().captures_iter(text) {
        let value: u64 = match caps[1].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        total = total.saturating_add(value.saturating_mul(unit_secs(&caps[2])));
    }
    if total == 0 { None } else { Some(total) }
}

/// True when the token is entirely `<int><letter>` runs, e.g. "1h30m".
pub fn is_shorthand_token(token: &str) -> bool {
    shorthand_token_re().is_match(token)
}

/// Sum all `<int><unit-letter>` runs in a shorthand token. Returns the raw
/// sum; callers treat zero as a format error.
pub fn shorthand_duration(token: &str) -> u64 {
    let mut total: u64 = 0;
    for caps in shorthand_re().captures_iter(token) {
        let value: u64 = match caps[1].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        total = total.saturating_add(value.saturating_mul(unit_secs(&caps[2])));
    }
    total
}

/// First day name found, probing the alias table in fixed order.
pub fn extract_weekday(text: &str) -> Option<Weekday> {
    day_res()
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(day, _)| *day)
}

/// First `H:MM`/`HH:MM` pattern, optionally preceded by "jam"/"pukul".
/// An out-of-range first match is None, not an error, so scanning can
/// continue to other candidate commands.
pub fn extract_clock_time(text: &str) -> Option<ClockTime> {
    let caps = clock_re().captures(text)?;
    let hour: u8 = caps[1].parse().ok()?;
    let minute: u8 = caps[2].parse().ok()?;
    ClockTime::new(hour, minute)
}

/// True when the text contains a raw `H:MM` shape, valid or not. Legacy
/// matchers use this to tell "no time given" apart from "invalid time".
pub fn has_time_shape(text: &str) -> bool {
    clock_re().is_match(text)
}
