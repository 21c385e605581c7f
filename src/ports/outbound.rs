//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, ReminderEntry, ScheduleEntry, Weekday};

/// Weekly class schedule records.
#[async_trait::async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn add(&self, entry: &ScheduleEntry) -> Result<(), DomainError>;

    /// Entries for one day, ordered by time ascending.
    async fn for_day(&self, day: Weekday) -> Result<Vec<ScheduleEntry>, DomainError>;

    /// Delete the entry at an exact day+time. Returns rows deleted.
    async fn remove(&self, day: Weekday, time: &str) -> Result<u64, DomainError>;

    /// Delete every entry for one day. Returns rows deleted.
    async fn clear_day(&self, day: Weekday) -> Result<u64, DomainError>;

    /// All entries, ordered by day then time.
    async fn all(&self) -> Result<Vec<ScheduleEntry>, DomainError>;

    /// Case-insensitive subject substring search.
    async fn search_subject(&self, keyword: &str) -> Result<Vec<ScheduleEntry>, DomainError>;

    /// Delete every entry whose subject contains the keyword
    /// (case-insensitive). Returns rows deleted.
    async fn delete_by_subject(&self, keyword: &str) -> Result<u64, DomainError>;
}

/// Personal reminder records.
#[async_trait::async_trait]
pub trait ReminderStore: Send + Sync {
    /// Insert a reminder; returns its id.
    async fn add(&self, user_id: i64, remind_at: i64, message: &str) -> Result<i64, DomainError>;

    /// Reminders whose due time has passed.
    async fn due(&self, now: i64) -> Result<Vec<ReminderEntry>, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// A user's reminders, due time ascending, at most `limit`.
    async fn for_user(&self, user_id: i64, limit: u32) -> Result<Vec<ReminderEntry>, DomainError>;

    /// Delete every reminder of one user. Returns rows deleted.
    async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, DomainError>;
}

/// Chat-platform gateway. Deliver replies, DMs, and announcements.
#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    /// Direct message to one user.
    async fn send_user(&self, user_id: i64, text: &str) -> Result<(), DomainError>;

    /// Message to a channel (daily announcements).
    async fn send_channel(&self, channel_id: i64, text: &str) -> Result<(), DomainError>;
}

/// Generative-AI backend. Invoked only when no structured intent matched.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Free-chat completion for `prompt`, given a textual snapshot of
    /// relevant store contents as grounding context.
    async fn reply(&self, prompt: &str, context: &str) -> Result<String, DomainError>;
}

/// Per-user rate limiting for AI fallback traffic.
pub trait RateLimiter: Send + Sync {
    /// True when `user_id` may proceed at `now` (epoch seconds); records
    /// the acquisition.
    fn try_acquire(&self, user_id: i64, now: i64) -> bool;
}
