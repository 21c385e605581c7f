//! SQLite-backed store via libsql. Implements ScheduleStore and
//! ReminderStore in one database file.
//!
//! Days are stored as the canonical lowercase English identifier, times as
//! the zero-padded `HH:MM` form so ORDER BY time sorts chronologically.
//! Week ordering of days is the caller's concern.

use crate::domain::{ClockTime, DomainError, ReminderEntry, ScheduleEntry, Weekday};
use crate::ports::{ReminderStore, ScheduleStore};
use libsql::{params, Database};
use std::path::Path;
use tracing::info;

const SCHEDULE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schedule (
    day_of_week TEXT NOT NULL,
    time TEXT NOT NULL,
    subject TEXT NOT NULL
)"#;

const REMINDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reminders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    remind_at INTEGER NOT NULL,
    message TEXT NOT NULL
)"#;

const REMINDERS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reminders_due ON reminders (remind_at)";

/// One database file (jadwalbot.db) in the given base directory.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Connect to (or create) the database and ensure the schema exists.
    /// Call once at startup; the returned store is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Store(e.to_string()))?;
        let db_path = base.join("jadwalbot.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Store(e.to_string()))?;

        // WAL mode enables concurrent readers + one writer. PRAGMA returns
        // a row; consume it (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("WAL pragma failed: {}", e)))?;
        while wal_rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
            .is_some()
        {}

        conn.execute(SCHEDULE_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(REMINDERS_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(REMINDERS_INDEX, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self { db })
    }

    fn conn(&self) -> Result<libsql::Connection, DomainError> {
        self.db.connect().map_err(|e| DomainError::Store(e.to_string()))
    }

    fn row_to_schedule(row: &libsql::Row) -> Result<ScheduleEntry, DomainError> {
        let day_raw: String = row.get(0).map_err(|e| DomainError::Store(e.to_string()))?;
        let time_raw: String = row.get(1).map_err(|e| DomainError::Store(e.to_string()))?;
        let subject: String = row.get(2).map_err(|e| DomainError::Store(e.to_string()))?;
        let day = Weekday::from_canonical(&day_raw)
            .ok_or_else(|| DomainError::Store(format!("bad day in row: {day_raw}")))?;
        let time = ClockTime::parse(&time_raw)
            .ok_or_else(|| DomainError::Store(format!("bad time in row: {time_raw}")))?;
        Ok(ScheduleEntry { day, time, subject })
    }

    fn row_to_reminder(row: &libsql::Row) -> Result<ReminderEntry, DomainError> {
        Ok(ReminderEntry {
            id: row.get(0).map_err(|e| DomainError::Store(e.to_string()))?,
            user_id: row.get(1).map_err(|e| DomainError::Store(e.to_string()))?,
            remind_at: row.get(2).map_err(|e| DomainError::Store(e.to_string()))?,
            message: row.get(3).map_err(|e| DomainError::Store(e.to_string()))?,
        })
    }

    async fn collect_schedules(
        mut rows: libsql::Rows,
    ) -> Result<Vec<ScheduleEntry>, DomainError> {
        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            entries.push(Self::row_to_schedule(&row)?);
        }
        Ok(entries)
    }

    async fn collect_reminders(
        mut rows: libsql::Rows,
    ) -> Result<Vec<ReminderEntry>, DomainError> {
        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            entries.push(Self::row_to_reminder(&row)?);
        }
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl ScheduleStore for SqliteStore {
    async fn add(&self, entry: &ScheduleEntry) -> Result<(), DomainError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO schedule (day_of_week, time, subject) VALUES (?1, ?2, ?3)",
            params![
                entry.day.canonical(),
                entry.time.to_string(),
                entry.subject.as_str()
            ],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    async fn for_day(&self, day: Weekday) -> Result<Vec<ScheduleEntry>, DomainError> {
        let conn = self.conn()?;
        let rows = conn
            .query(
                "SELECT day_of_week, time, subject FROM schedule WHERE day_of_week = ?1 ORDER BY time",
                params![day.canonical()],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Self::collect_schedules(rows).await
    }

    async fn remove(&self, day: Weekday, time: &str) -> Result<u64, DomainError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM schedule WHERE day_of_week = ?1 AND time = ?2",
            params![day.canonical(), time],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))
    }

    async fn clear_day(&self, day: Weekday) -> Result<u64, DomainError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM schedule WHERE day_of_week = ?1",
            params![day.canonical()],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))
    }

    async fn all(&self) -> Result<Vec<ScheduleEntry>, DomainError> {
        let conn = self.conn()?;
        let rows = conn
            .query(
                "SELECT day_of_week, time, subject FROM schedule ORDER BY day_of_week, time",
                (),
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Self::collect_schedules(rows).await
    }

    async fn search_subject(&self, keyword: &str) -> Result<Vec<ScheduleEntry>, DomainError> {
        let conn = self.conn()?;
        let pattern = format!("%{}%", keyword.to_lowercase());
        let rows = conn
            .query(
                "SELECT day_of_week, time, subject FROM schedule WHERE LOWER(subject) LIKE ?1 ORDER BY day_of_week, time",
                params![pattern],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Self::collect_schedules(rows).await
    }

    async fn delete_by_subject(&self, keyword: &str) -> Result<u64, DomainError> {
        let conn = self.conn()?;
        let pattern = format!("%{}%", keyword.to_lowercase());
        conn.execute(
            "DELETE FROM schedule WHERE LOWER(subject) LIKE ?1",
            params![pattern],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ReminderStore for SqliteStore {
    async fn add(&self, user_id: i64, remind_at: i64, message: &str) -> Result<i64, DomainError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reminders (user_id, remind_at, message) VALUES (?1, ?2, ?3)",
            params![user_id, remind_at, message],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(conn.last_insert_rowid())
    }

    async fn due(&self, now: i64) -> Result<Vec<ReminderEntry>, DomainError> {
        let conn = self.conn()?;
        let rows = conn
            .query(
                "SELECT id, user_id, remind_at, message FROM reminders WHERE remind_at <= ?1",
                params![now],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Self::collect_reminders(rows).await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM reminders WHERE id = ?1", params![id])
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    async fn for_user(&self, user_id: i64, limit: u32) -> Result<Vec<ReminderEntry>, DomainError> {
        let conn = self.conn()?;
        let rows = conn
            .query(
                "SELECT id, user_id, remind_at, message FROM reminders WHERE user_id = ?1 ORDER BY remind_at LIMIT ?2",
                params![user_id, limit as i64],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Self::collect_reminders(rows).await
    }

    async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, DomainError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM reminders WHERE user_id = ?1", params![user_id])
            .await
            .map_err(|e| DomainError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(dir.path()).await.unwrap();
        (dir, store)
    }

    fn entry(day: Weekday, h: u8, m: u8, subject: &str) -> ScheduleEntry {
        ScheduleEntry {
            day,
            time: ClockTime::new(h, m).unwrap(),
            subject: subject.to_string(),
        }
    }

    #[tokio::test]
    async fn schedule_round_trip_sorted_by_time() {
        let (_dir, store) = store().await;
        ScheduleStore::add(&store, &entry(Weekday::Monday, 10, 0, "basis data")).await.unwrap();
        ScheduleStore::add(&store, &entry(Weekday::Monday, 8, 0, "kuliah AI")).await.unwrap();
        ScheduleStore::add(&store, &entry(Weekday::Tuesday, 13, 0, "kalkulus")).await.unwrap();

        let monday = store.for_day(Weekday::Monday).await.unwrap();
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].subject, "kuliah AI");
        assert_eq!(monday[1].subject, "basis data");
        assert_eq!(store.all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn remove_deletes_only_exact_day_and_time() {
        let (_dir, store) = store().await;
        ScheduleStore::add(&store, &entry(Weekday::Monday, 8, 0, "kuliah AI")).await.unwrap();
        ScheduleStore::add(&store, &entry(Weekday::Tuesday, 8, 0, "kalkulus")).await.unwrap();

        assert_eq!(store.remove(Weekday::Monday, "08:00").await.unwrap(), 1);
        assert_eq!(store.remove(Weekday::Monday, "08:00").await.unwrap(), 0);
        assert_eq!(store.for_day(Weekday::Tuesday).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subject_search_and_delete_are_case_insensitive() {
        let (_dir, store) = store().await;
        ScheduleStore::add(&store, &entry(Weekday::Friday, 10, 0, "Basis Data")).await.unwrap();
        ScheduleStore::add(&store, &entry(Weekday::Monday, 8, 0, "kuliah AI")).await.unwrap();

        let found = store.search_subject("basis").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subject, "Basis Data");

        assert_eq!(store.delete_by_subject("BASIS").await.unwrap(), 1);
        assert!(store.search_subject("basis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reminders_due_and_ordering() {
        let (_dir, store) = store().await;
        let id1 = ReminderStore::add(&store, 7, 100, "dulu").await.unwrap();
        let id2 = ReminderStore::add(&store, 7, 50, "lebih awal").await.unwrap();
        assert!(id2 > id1);

        let due = store.due(60).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].message, "lebih awal");

        let listed = store.for_user(7, 10).await.unwrap();
        assert_eq!(listed[0].message, "lebih awal");
        assert_eq!(listed[1].message, "dulu");

        store.delete(id2).await.unwrap();
        assert!(store.due(60).await.unwrap().is_empty());
        assert_eq!(store.delete_all_for_user(7).await.unwrap(), 1);
    }
}
