//! Sensitive-content guard. Scans free-text payloads destined for the
//! store against a fixed denylist before anything is persisted.
//!
//! Matching is substring containment, not token match: it catches
//! compounds and inflections at the cost of false positives on long
//! keywords embedded in unrelated words. Policy is refuse-whole: one hit
//! blocks the entire payload, nothing is redacted or stored.

/// Checked in declaration order; the first hit is the one echoed back.
pub const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "kata sandi",
    "passwd",
    "api key",
    "apikey",
    "token",
    "secret",
    "private key",
    "cvv",
    "rekening",
    "credit card",
    "nomor kartu",
];

/// Case-insensitive substring search. Pure predicate, no side effects.
pub fn check(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    SENSITIVE_KEYWORDS.iter().copied().find(|kw| lower.contains(kw))
}
