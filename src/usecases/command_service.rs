//! Executes interpreted Commands against the stores and renders the reply.
//!
//! Privileged gating lives here, not in the matchers: the help text varies
//! by admin flag but parsing behavior never does. "Today" resolves here
//! too, using the current date at fixed UTC+7 (WIB, no DST), so the
//! interpreter stays pure.

use crate::domain::{
    Command, DomainError, ReminderSelector, ScheduleEntry, ScheduleScope, Weekday,
};
use crate::ports::{ReminderStore, ScheduleStore};
use chrono::{DateTime, Datelike, Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Jakarta offset, fixed. No DST rules apply.
const WIB_OFFSET_HOURS: i64 = 7;

/// Weekday of `now` as seen from UTC+7.
pub fn today_wib(now: DateTime<Utc>) -> Weekday {
    Weekday::from_chrono((now + Duration::hours(WIB_OFFSET_HOURS)).weekday())
}

/// `HH:MM` wall-clock of `now` as seen from UTC+7.
pub fn clock_wib(now: DateTime<Utc>) -> String {
    (now + Duration::hours(WIB_OFFSET_HOURS))
        .format("%H:%M")
        .to_string()
}

fn format_due_wib(remind_at: i64) -> String {
    match DateTime::from_timestamp(remind_at, 0) {
        Some(t) => (t + Duration::hours(WIB_OFFSET_HOURS))
            .format("%d/%m %H:%M WIB")
            .to_string(),
        None => remind_at.to_string(),
    }
}

/// Most reminders a listing shows, matching the store's ascending order.
const REMINDER_LIST_LIMIT: u32 = 5;

/// Upper bound when resolving Latest/ByKeyword selectors client-side.
const REMINDER_RESOLVE_LIMIT: u32 = 100;

pub struct CommandService {
    schedules: Arc<dyn ScheduleStore>,
    reminders: Arc<dyn ReminderStore>,
}

impl CommandService {
    pub fn new(schedules: Arc<dyn ScheduleStore>, reminders: Arc<dyn ReminderStore>) -> Self {
        Self {
            schedules,
            reminders,
        }
    }

    /// Execute one Command for one user. Returns the reply text, or None
    /// for `Unrecognized` (the caller then falls back to the AI backend).
    pub async fn execute(
        &self,
        cmd: Command,
        user_id: i64,
        is_admin: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, DomainError> {
        if !is_admin && mutates_schedule(&cmd) {
            info!(user_id, "schedule mutation denied for non-admin");
            return Ok(Some("🚫 Perintah ini khusus admin.".to_string()));
        }

        let reply = match cmd {
            Command::AddSchedule { day, time, subject } => {
                self.schedules
                    .add(&ScheduleEntry {
                        day,
                        time,
                        subject: subject.clone(),
                    })
                    .await?;
                info!(day = %day, time = %time, "schedule added");
                format!("✅ Jadwal {} jam {} berhasil ditambah!", day.display(), time)
            }

            Command::DeleteScheduleByTime { day, time } => {
                // The store has no day-scoped bulk primitive for this path;
                // resolve the exact entry client-side before deleting.
                let entries = self.schedules.for_day(day).await?;
                if entries.iter().any(|e| e.time == time) {
                    self.schedules.remove(day, &time.to_string()).await?;
                    format!("✅ Jadwal {} {} dihapus!", day.display(), time)
                } else {
                    format!("❌ Gak ada jadwal {} jam {}.", day.display(), time)
                }
            }

            Command::DeleteScheduleBySubject { keyword } => {
                let deleted = self.schedules.delete_by_subject(&keyword).await?;
                if deleted > 0 {
                    format!("✅ {deleted} jadwal yang cocok dengan \"{keyword}\" dihapus.")
                } else {
                    format!("❌ Gak ada jadwal yang cocok dengan \"{keyword}\".")
                }
            }

            Command::AddReminder {
                duration_secs,
                text,
            } => {
                // Durations come from user text and can exceed i64 seconds;
                // a wrapping cast would land the due time in the past.
                let duration = i64::try_from(duration_secs).unwrap_or(i64::MAX);
                let remind_at = now.timestamp().saturating_add(duration);
                self.reminders.add(user_id, remind_at, &text).await?;
                info!(user_id, remind_at, "reminder added");
                format!("✅ Oke, nanti aku DM ya! ({})", format_due_wib(remind_at))
            }

            Command::DeleteReminder { selector } => {
                self.delete_reminders(user_id, selector).await?
            }

            Command::ListSchedule { scope } => {
                let day = match scope {
                    ScheduleScope::Day(d) => Some(d),
                    ScheduleScope::Today => Some(today_wib(now)),
                    ScheduleScope::All => None,
                };
                match day {
                    Some(day) => {
                        let entries = self.schedules.for_day(day).await?;
                        render_day(day, &entries)
                    }
                    None => {
                        let entries = self.schedules.all().await?;
                        render_all(&entries)
                    }
                }
            }

            Command::SearchSchedule { keyword } => {
                let entries = self.schedules.search_subject(&keyword).await?;
                if entries.is_empty() {
                    format!("❌ Gak ada jadwal yang cocok dengan \"{keyword}\".")
                } else {
                    let mut text = format!("🔍 Jadwal yang cocok dengan \"{keyword}\":");
                    for e in &entries {
                        text.push_str(&format!(
                            "\n📅 {} 🕒 {} — {}",
                            e.day.display(),
                            e.time,
                            e.subject
                        ));
                    }
                    text
                }
            }

            Command::ListReminders => {
                let entries = self
                    .reminders
                    .for_user(user_id, REMINDER_LIST_LIMIT)
                    .await?;
                if entries.is_empty() {
                    "Kamu belum punya reminder.".to_string()
                } else {
                    let mut text = "⏰ Reminder kamu:".to_string();
                    for r in &entries {
                        text.push_str(&format!(
                            "\n• {} — {}",
                            format_due_wib(r.remind_at),
                            r.message
                        ));
                    }
                    text
                }
            }

            Command::TimeQuery => {
                format!("🕒 Sekarang jam {} WIB.", clock_wib(now))
            }

            Command::Help => help_text(is_admin),

            Command::Refusal { keyword } => {
                info!(keyword, "payload refused by sensitive-content guard");
                format!(
                    "🚫 Gak bisa disimpan: teks mengandung kata sensitif \"{keyword}\". Hapus bagian itu dulu ya."
                )
            }

            Command::Correction { message } => message,

            Command::Unrecognized => return Ok(None),
        };
        Ok(Some(reply))
    }

    async fn delete_reminders(
        &self,
        user_id: i64,
        selector: ReminderSelector,
    ) -> Result<String, DomainError> {
        match selector {
            ReminderSelector::ById(id) => {
                self.reminders.delete(id).await?;
                Ok("✅ Reminder dihapus.".to_string())
            }
            ReminderSelector::All => {
                let deleted = self.reminders.delete_all_for_user(user_id).await?;
                if deleted > 0 {
                    Ok(format!("✅ {deleted} reminder dihapus."))
                } else {
                    Ok("Kamu belum punya reminder.".to_string())
                }
            }
            ReminderSelector::Latest => {
                let entries = self
                    .reminders
                    .for_user(user_id, REMINDER_RESOLVE_LIMIT)
                    .await?;
                // Highest id = most recently created.
                match entries.iter().max_by_key(|r| r.id) {
                    Some(latest) => {
                        self.reminders.delete(latest.id).await?;
                        Ok(format!("✅ Reminder terbaru dihapus: {}", latest.message))
                    }
                    None => Ok("Kamu belum punya reminder.".to_string()),
                }
            }
            ReminderSelector::ByKeyword(keyword) => {
                let needle = keyword.to_lowercase();
                let entries = self
                    .reminders
                    .for_user(user_id, REMINDER_RESOLVE_LIMIT)
                    .await?;
                let matching: Vec<_> = entries
                    .iter()
                    .filter(|r| r.message.to_lowercase().contains(&needle))
                    .collect();
                if matching.is_empty() {
                    return Ok(format!(
                        "❌ Gak ada reminder yang cocok dengan \"{keyword}\"."
                    ));
                }
                let count = matching.len();
                for r in matching {
                    self.reminders.delete(r.id).await?;
                }
                Ok(format!(
                    "✅ {count} reminder yang cocok dengan \"{keyword}\" dihapus."
                ))
            }
        }
    }
}

fn mutates_schedule(cmd: &Command) -> bool {
    matches!(
        cmd,
        Command::AddSchedule { .. }
            | Command::DeleteScheduleByTime { .. }
            | Command::DeleteScheduleBySubject { .. }
    )
}

fn render_day(day: Weekday, entries: &[ScheduleEntry]) -> String {
    if entries.is_empty() {
        return format!("Gak ada jadwal buat hari {}.", day.display());
    }
    let mut text = format!("📅 Jadwal - {}", day.display());
    for e in entries {
        text.push_str(&format!("\n🕒 {} — {}", e.time, e.subject));
    }
    text
}

fn render_all(entries: &[ScheduleEntry]) -> String {
    if entries.is_empty() {
        return "Belum ada jadwal tersimpan.".to_string();
    }
    let mut text = "📅 Semua Jadwal".to_string();
    for day in Weekday::ALL {
        let day_entries: Vec<_> = entries.iter().filter(|e| e.day == day).collect();
        if day_entries.is_empty() {
            continue;
        }
        text.push_str(&format!("\n\n{}:", day.display()));
        for e in day_entries {
            text.push_str(&format!("\n🕒 {} — {}", e.time, e.subject));
        }
    }
    text
}

fn help_text(is_admin: bool) -> String {
    let mut text = "📖 Bantuan\n\
        Umum:\n\
        • jadwal [hari] — cek jadwal (kosong = hari ini)\n\
        • semua jadwal — semua hari\n\
        • cari jadwal <kata> — cari mata kuliah\n\
        • ingatkan aku dalam 5 menit untuk <pesan> — pasang reminder\n\
        • reminder 1h30m <pesan> — reminder format singkat\n\
        • reminder — daftar reminder kamu\n\
        • hapus reminder <kata|terbaru|semua>\n\
        • jam berapa — waktu sekarang (WIB)"
        .to_string();
    if is_admin {
        text.push_str(
            "\nAdmin:\n\
            • tambah jadwal <hari> <jam> <matkul>\n\
            • hapus jadwal <hari> <jam>\n\
            • hapus jadwal <kata kunci>",
        );
    }
    text.push_str("\nSelain itu? Mention aja, nanti dijawab AI. 🤖");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, ReminderEntry};
    use std::sync::Mutex;

    /// In-memory stores for exercising execute() without SQLite.
    #[derive(Default)]
    struct MemStores {
        schedule: Mutex<Vec<ScheduleEntry>>,
        reminders: Mutex<Vec<ReminderEntry>>,
        next_id: Mutex<i64>,
    }

    #[async_trait::async_trait]
    impl ScheduleStore for MemStores {
        async fn add(&self, entry: &ScheduleEntry) -> Result<(), DomainError> {
            self.schedule.lock().unwrap().push(entry.clone());
            Ok(())
        }
        async fn for_day(&self, day: Weekday) -> Result<Vec<ScheduleEntry>, DomainError> {
            let mut out: Vec<_> = self
                .schedule
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.day == day)
                .cloned()
                .collect();
            out.sort_by_key(|e| e.time.to_string());
            Ok(out)
        }
        async fn remove(&self, day: Weekday, time: &str) -> Result<u64, DomainError> {
            let mut entries = self.schedule.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| !(e.day == day && e.time.to_string() == time));
            Ok((before - entries.len()) as u64)
        }
        async fn clear_day(&self, day: Weekday) -> Result<u64, DomainError> {
            let mut entries = self.schedule.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.day != day);
            Ok((before - entries.len()) as u64)
        }
        async fn all(&self) -> Result<Vec<ScheduleEntry>, DomainError> {
            Ok(self.schedule.lock().unwrap().clone())
        }
        async fn search_subject(&self, keyword: &str) -> Result<Vec<ScheduleEntry>, DomainError> {
            let needle = keyword.to_lowercase();
            Ok(self
                .schedule
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.subject.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }
        async fn delete_by_subject(&self, keyword: &str) -> Result<u64, DomainError> {
            let needle = keyword.to_lowercase();
            let mut entries = self.schedule.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| !e.subject.to_lowercase().contains(&needle));
            Ok((before - entries.len()) as u64)
        }
    }

    #[async_trait::async_trait]
    impl ReminderStore for MemStores {
        async fn add(
            &self,
            user_id: i64,
            remind_at: i64,
            message: &str,
        ) -> Result<i64, DomainError> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let id = *next;
            self.reminders.lock().unwrap().push(ReminderEntry {
                id,
                user_id,
                remind_at,
                message: message.to_string(),
            });
            Ok(id)
        }
        async fn due(&self, now: i64) -> Result<Vec<ReminderEntry>, DomainError> {
            Ok(self
                .reminders
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.remind_at <= now)
                .cloned()
                .collect())
        }
        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            self.reminders.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
        async fn for_user(
            &self,
            user_id: i64,
            limit: u32,
        ) -> Result<Vec<ReminderEntry>, DomainError> {
            let mut out: Vec<_> = self
                .reminders
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            out.sort_by_key(|r| r.remind_at);
            out.truncate(limit as usize);
            Ok(out)
        }
        async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, DomainError> {
            let mut entries = self.reminders.lock().unwrap();
            let before = entries.len();
            entries.retain(|r| r.user_id != user_id);
            Ok((before - entries.len()) as u64)
        }
    }

    /// Store double that fails the test if any mutation or read runs.
    /// Proves the refuse-whole policy never touches persistence.
    struct PanickingStores;

    #[async_trait::async_trait]
    impl ScheduleStore for PanickingStores {
        async fn add(&self, _: &ScheduleEntry) -> Result<(), DomainError> {
            panic!("store must not be touched");
        }
        async fn for_day(&self, _: Weekday) -> Result<Vec<ScheduleEntry>, DomainError> {
            panic!("store must not be touched");
        }
        async fn remove(&self, _: Weekday, _: &str) -> Result<u64, DomainError> {
            panic!("store must not be touched");
        }
        async fn clear_day(&self, _: Weekday) -> Result<u64, DomainError> {
            panic!("store must not be touched");
        }
        async fn all(&self) -> Result<Vec<ScheduleEntry>, DomainError> {
            panic!("store must not be touched");
        }
        async fn search_subject(&self, _: &str) -> Result<Vec<ScheduleEntry>, DomainError> {
            panic!("store must not be touched");
        }
        async fn delete_by_subject(&self, _: &str) -> Result<u64, DomainError> {
            panic!("store must not be touched");
        }
    }

    #[async_trait::async_trait]
    impl ReminderStore for PanickingStores {
        async fn add(&self, _: i64, _: i64, _: &str) -> Result<i64, DomainError> {
            panic!("store must not be touched");
        }
        async fn due(&self, _: i64) -> Result<Vec<ReminderEntry>, DomainError> {
            panic!("store must not be touched");
        }
        async fn delete(&self, _: i64) -> Result<(), DomainError> {
            panic!("store must not be touched");
        }
        async fn for_user(&self, _: i64, _: u32) -> Result<Vec<ReminderEntry>, DomainError> {
            panic!("store must not be touched");
        }
        async fn delete_all_for_user(&self, _: i64) -> Result<u64, DomainError> {
            panic!("store must not be touched");
        }
    }

    fn service() -> (Arc<MemStores>, CommandService) {
        let stores = Arc::new(MemStores::default());
        let svc = CommandService::new(stores.clone(), stores.clone());
        (stores, svc)
    }

    #[tokio::test]
    async fn add_then_delete_schedule_by_time() {
        let (_, svc) = service();
        let now = Utc::now();
        let time = ClockTime::new(8, 0).unwrap();
        let reply = svc
            .execute(
                Command::AddSchedule {
                    day: Weekday::Monday,
                    time,
                    subject: "kuliah AI".to_string(),
                },
                1,
                true,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Senin"));
        assert!(reply.contains("08:00"));

        let reply = svc
            .execute(
                Command::DeleteScheduleByTime {
                    day: Weekday::Monday,
                    time,
                },
                1,
                true,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.starts_with("✅"));

        // Second delete finds nothing: the entry is gone.
        let reply = svc
            .execute(
                Command::DeleteScheduleByTime {
                    day: Weekday::Monday,
                    time,
                },
                1,
                true,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.starts_with("❌"));
    }

    #[tokio::test]
    async fn huge_reminder_duration_stays_in_the_future() {
        let (stores, svc) = service();
        let now = Utc::now();
        svc.execute(
            Command::AddReminder {
                duration_secs: u64::MAX,
                text: "tes".to_string(),
            },
            1,
            false,
            now,
        )
        .await
        .unwrap()
        .unwrap();

        // An added reminder is never already due.
        assert!(stores.due(now.timestamp()).await.unwrap().is_empty());
        let stored = &stores.for_user(1, 10).await.unwrap()[0];
        assert!(stored.remind_at > now.timestamp());
    }

    #[tokio::test]
    async fn delete_latest_reminder_picks_newest_created() {
        let (stores, svc) = service();
        let now = Utc::now();
        // Older creation but later due time, then newer creation due sooner.
        ReminderStore::add(stores.as_ref(), 7, now.timestamp() + 9000, "due later")
            .await
            .unwrap();
        ReminderStore::add(stores.as_ref(), 7, now.timestamp() + 60, "created last")
            .await
            .unwrap();

        let reply = svc
            .execute(
                Command::DeleteReminder {
                    selector: ReminderSelector::Latest,
                },
                7,
                false,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("created last"));
    }

    #[tokio::test]
    async fn delete_reminders_by_keyword_is_case_insensitive() {
        let (stores, svc) = service();
        let now = Utc::now();
        ReminderStore::add(stores.as_ref(), 7, now.timestamp() + 60, "Presentasi akhir")
            .await
            .unwrap();
        ReminderStore::add(stores.as_ref(), 7, now.timestamp() + 120, "makan siang")
            .await
            .unwrap();

        let reply = svc
            .execute(
                Command::DeleteReminder {
                    selector: ReminderSelector::ByKeyword("presentasi".to_string()),
                },
                7,
                false,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("1 reminder"));
        assert_eq!(stores.for_user(7, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refusal_never_touches_the_store() {
        let stores = Arc::new(PanickingStores);
        let svc = CommandService::new(stores.clone(), stores);
        let reply = svc
            .execute(
                Command::Refusal {
                    keyword: "password",
                },
                1,
                false,
                Utc::now(),
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("password"));
    }

    #[tokio::test]
    async fn schedule_mutation_is_admin_only() {
        let (stores, svc) = service();
        let now = Utc::now();
        let reply = svc
            .execute(
                Command::AddSchedule {
                    day: Weekday::Monday,
                    time: ClockTime::new(8, 0).unwrap(),
                    subject: "kuliah AI".to_string(),
                },
                1,
                false,
                now,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("khusus admin"));
        assert!(stores.for_day(Weekday::Monday).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn help_varies_by_admin_flag() {
        let (_, svc) = service();
        let now = Utc::now();
        let member = svc.execute(Command::Help, 1, false, now).await.unwrap().unwrap();
        let admin = svc.execute(Command::Help, 1, true, now).await.unwrap().unwrap();
        assert!(!member.contains("Admin:"));
        assert!(admin.contains("Admin:"));
    }

    #[tokio::test]
    async fn unrecognized_yields_no_reply() {
        let (_, svc) = service();
        let out = svc
            .execute(Command::Unrecognized, 1, false, Utc::now())
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn today_wib_shifts_across_midnight() {
        // 2026-01-05 is a Monday; 20:00 UTC is 03:00 Tuesday in WIB.
        let now = DateTime::parse_from_rfc3339("2026-01-05T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(today_wib(now), Weekday::Tuesday);
        assert_eq!(clock_wib(now), "03:00");
    }
}
