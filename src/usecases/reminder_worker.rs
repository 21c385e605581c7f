//! Due-reminder delivery loop: poll the store -> DM the user -> delete.
//!
//! Delivery failures are logged and the reminder is still deleted, so a
//! closed DM can never wedge the queue.

use crate::domain::DomainError;
use crate::ports::{ChatGateway, ReminderStore};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct ReminderWorker {
    reminders: Arc<dyn ReminderStore>,
    gateway: Arc<dyn ChatGateway>,
    /// Sleep between polls.
    tick: Duration,
}

impl ReminderWorker {
    pub fn new(
        reminders: Arc<dyn ReminderStore>,
        gateway: Arc<dyn ChatGateway>,
        tick: Duration,
    ) -> Self {
        Self {
            reminders,
            gateway,
            tick,
        }
    }

    /// Run the polling loop until the process stops.
    pub async fn run(&self) {
        info!(tick_secs = self.tick.as_secs(), "reminder worker started");
        loop {
            if let Err(e) = self.tick_once().await {
                warn!(error = %e, "reminder tick failed");
            }
            tokio::time::sleep(self.tick).await;
        }
    }

    /// Deliver and delete everything currently due. Returns how many
    /// reminders were processed.
    pub async fn tick_once(&self) -> Result<usize, DomainError> {
        let now = Utc::now().timestamp();
        let due = self.reminders.due(now).await?;
        let count = due.len();
        for reminder in due {
            if let Err(e) = self
                .gateway
                .send_user(reminder.user_id, &format!("⏰ Reminder: {}", reminder.message))
                .await
            {
                warn!(user_id = reminder.user_id, error = %e, "reminder DM failed");
            }
            self.reminders.delete(reminder.id).await?;
        }
        if count > 0 {
            info!(count, "delivered due reminders");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReminderEntry;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeReminders {
        entries: Mutex<Vec<ReminderEntry>>,
    }

    #[async_trait::async_trait]
    impl ReminderStore for FakeReminders {
        async fn add(&self, user_id: i64, remind_at: i64, message: &str) -> Result<i64, DomainError> {
            let mut entries = self.entries.lock().unwrap();
            let id = entries.len() as i64 + 1;
            entries.push(ReminderEntry {
                id,
                user_id,
                remind_at,
                message: message.to_string(),
            });
            Ok(id)
        }
        async fn due(&self, now: i64) -> Result<Vec<ReminderEntry>, DomainError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.remind_at <= now)
                .cloned()
                .collect())
        }
        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            self.entries.lock().unwrap().retain(|r| r.id != id);
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
    struct RecordingGateway {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait::async_trait]
    impl ChatGateway for RecordingGateway {
        async fn send_user(&self, user_id: i64, text: &str) -> Result<(), DomainError> {
            self.sent.lock().unwrap().push((user_id, text.to_string()));
            Ok(())
        }
        async fn send_channel(&self, _: i64, _: &str) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivers_and_deletes_only_due_reminders() {
        let store = Arc::new(FakeReminders::default());
        let gateway = Arc::new(RecordingGateway::default());
        let now = Utc::now().timestamp();
        store.add(1, now - 10, "sudah lewat").await.unwrap();
        store.add(2, now + 3600, "masih lama").await.unwrap();

        let worker = ReminderWorker::new(store.clone(), gateway.clone(), Duration::from_secs(15));
        let processed = worker.tick_once().await.unwrap();

        assert_eq!(processed, 1);
        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 1);
        assert!(sent[0].1.contains("sudah lewat"));
        // The undelivered future reminder is untouched.
        assert_eq!(store.due(now + 7200).await.unwrap().len(), 1);
    }
}
