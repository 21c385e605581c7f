//! Daily schedule announcement: once per cycle, post today's entries to
//! the configured channel. Days with nothing scheduled stay silent.

use crate::domain::DomainError;
use crate::ports::{ChatGateway, ScheduleStore};
use crate::usecases::command_service::today_wib;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct Announcer {
    schedules: Arc<dyn ScheduleStore>,
    gateway: Arc<dyn ChatGateway>,
    channel_id: i64,
    /// Sleep between announcements (normally 24h).
    period: Duration,
}

impl Announcer {
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        gateway: Arc<dyn ChatGateway>,
        channel_id: i64,
        period: Duration,
    ) -> Self {
        Self {
            schedules,
            gateway,
            channel_id,
            period,
        }
    }

    pub async fn run(&self) {
        info!(
            channel_id = self.channel_id,
            period_secs = self.period.as_secs(),
            "announcer started"
        );
        loop {
            if let Err(e) = self.announce_today().await {
                warn!(error = %e, "announcement failed");
            }
            tokio::time::sleep(self.period).await;
        }
    }

    /// Post today's schedule, if any.
    pub async fn announce_today(&self) -> Result<(), DomainError> {
        let day = today_wib(Utc::now());
        let entries = self.schedules.for_day(day).await?;
        if entries.is_empty() {
            return Ok(());
        }
        let mut text = format!("📅 Jadwal Kuliah Hari Ini ({})", day.display());
        for e in &entries {
            text.push_str(&format!("\n🕒 {} — {}", e.time, e.subject));
        }
        self.gateway.send_channel(self.channel_id, &text).await
    }
}
