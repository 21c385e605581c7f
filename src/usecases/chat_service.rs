//! Inbound message flow: interpret → execute, or fall back to the AI
//! backend when no structured intent matched.
//!
//! The rate limiter only gates the AI fallback; structured commands are
//! always served. AI replies are chunked at the transport's 2000-character
//! boundary before delivery.

use crate::domain::{Command, DomainError};
use crate::interpreter::Interpreter;
use crate::ports::{AiPort, RateLimiter, ScheduleStore};
use crate::usecases::CommandService;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Transport message limit; longer AI replies are split at this boundary.
pub const MAX_CHUNK_CHARS: usize = 2000;

pub struct ChatService {
    interpreter: Interpreter,
    commands: Arc<CommandService>,
    schedules: Arc<dyn ScheduleStore>,
    ai: Arc<dyn AiPort>,
    limiter: Arc<dyn RateLimiter>,
}

impl ChatService {
    pub fn new(
        interpreter: Interpreter,
        commands: Arc<CommandService>,
        schedules: Arc<dyn ScheduleStore>,
        ai: Arc<dyn AiPort>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            interpreter,
            commands,
            schedules,
            ai,
            limiter,
        }
    }

    /// Handle one complete inbound message. Returns the ordered reply
    /// chunks to deliver.
    pub async fn handle_message(
        &self,
        user_id: i64,
        is_admin: bool,
        text: &str,
    ) -> Result<Vec<String>, DomainError> {
        let now = Utc::now();
        let cmd = self.interpreter.interpret(text);

        if cmd == Command::Unrecognized {
            if !self.limiter.try_acquire(user_id, now.timestamp()) {
                debug!(user_id, "AI fallback rate-limited");
                return Ok(vec![
                    "⏳ Sabar ya, tunggu sebentar sebelum tanya lagi.".to_string(),
                ]);
            }
            let context = self.schedule_snapshot().await?;
            info!(user_id, len = text.len(), "forwarding to AI backend");
            let reply = self.ai.reply(text, &context).await?;
            return Ok(chunk_reply(&reply, MAX_CHUNK_CHARS));
        }

        match self.commands.execute(cmd, user_id, is_admin, now).await? {
            Some(reply) => Ok(vec![reply]),
            None => Ok(Vec::new()),
        }
    }

    /// Textual snapshot of the stored schedule, handed to the AI backend
    /// as grounding context.
    async fn schedule_snapshot(&self) -> Result<String, DomainError> {
        let entries = self.schedules.all().await?;
        if entries.is_empty() {
            return Ok("(belum ada jadwal tersimpan)".to_string());
        }
        let mut text = String::from("Jadwal kuliah tersimpan:");
        for e in &entries {
            text.push_str(&format!("\n{} {} {}", e.day.display(), e.time, e.subject));
        }
        Ok(text)
    }
}

/// Split on character count, never inside a UTF-8 code point.
pub fn chunk_reply(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReminderEntry, ScheduleEntry, Weekday};
    use crate::ports::ReminderStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct EmptyStores;

    #[async_trait::async_trait]
    impl ScheduleStore for EmptyStores {
        async fn add(&self, _: &ScheduleEntry) -> Result<(), DomainError> {
            Ok(())
        }
        async fn for_day(&self, _: Weekday) -> Result<Vec<ScheduleEntry>, DomainError> {
            Ok(Vec::new())
        }
        async fn remove(&self, _: Weekday, _: &str) -> Result<u64, DomainError> {
            Ok(0)
        }
        async fn clear_day(&self, _: Weekday) -> Result<u64, DomainError> {
            Ok(0)
        }
        async fn all(&self) -> Result<Vec<ScheduleEntry>, DomainError> {
            Ok(Vec::new())
        }
        async fn search_subject(&self, _: &str) -> Result<Vec<ScheduleEntry>, DomainError> {
            Ok(Vec::new())
        }
        async fn delete_by_subject(&self, _: &str) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[async_trait::async_trait]
    impl ReminderStore for EmptyStores {
        async fn add(&self, _: i64, _: i64, _: &str) -> Result<i64, DomainError> {
            Ok(1)
        }
        async fn due(&self, _: i64) -> Result<Vec<ReminderEntry>, DomainError> {
            Ok(Vec::new())
        }
        async fn delete(&self, _: i64) -> Result<(), DomainError> {
            Ok(())
        }
        async fn for_user(&self, _: i64, _: u32) -> Result<Vec<ReminderEntry>, DomainError> {
            Ok(Vec::new())
        }
        async fn delete_all_for_user(&self, _: i64) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    #[derive(Default)]
    struct CountingAi {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AiPort for CountingAi {
        async fn reply(&self, _: &str, _: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("jawaban AI".to_string())
        }
    }

    struct FixedLimiter {
        allow: AtomicBool,
    }

    impl RateLimiter for FixedLimiter {
        fn try_acquire(&self, _: i64, _: i64) -> bool {
            self.allow.load(Ordering::SeqCst)
        }
    }

    fn chat(allow: bool) -> (Arc<CountingAi>, ChatService) {
        let stores = Arc::new(EmptyStores);
        let ai = Arc::new(CountingAi::default());
        let commands = Arc::new(CommandService::new(stores.clone(), stores.clone()));
        let svc = ChatService::new(
            Interpreter::new(),
            commands,
            stores,
            ai.clone(),
            Arc::new(FixedLimiter {
                allow: AtomicBool::new(allow),
            }),
        );
        (ai, svc)
    }

    #[tokio::test]
    async fn free_chat_goes_to_ai_when_allowed() {
        let (ai, svc) = chat(true);
        let replies = svc.handle_message(1, false, "halo apa kabar?").await.unwrap();
        assert_eq!(replies, vec!["jawaban AI".to_string()]);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limited_free_chat_never_reaches_ai() {
        let (ai, svc) = chat(false);
        let replies = svc.handle_message(1, false, "halo apa kabar?").await.unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("Sabar"));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn structured_command_bypasses_the_limiter() {
        // Limiter denies everything, but "jam berapa" is a structured
        // command and must still be served.
        let (ai, svc) = chat(false);
        let replies = svc.handle_message(1, false, "jam berapa").await.unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("WIB"));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn short_reply_is_one_chunk() {
        assert_eq!(chunk_reply("halo", 2000), vec!["halo".to_string()]);
    }

    #[test]
    fn long_reply_splits_at_boundary() {
        let text = "a".repeat(4500);
        let chunks = chunk_reply(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 2000);
        assert_eq!(chunks[2].chars().count(), 500);
    }

    #[test]
    fn chunking_counts_chars_not_bytes() {
        let text = "é".repeat(2001);
        let chunks = chunk_reply(&text, 2000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 1);
    }

    #[test]
    fn empty_reply_yields_no_chunks() {
        assert!(chunk_reply("", 2000).is_empty());
    }
}
