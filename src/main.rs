//! Wiring & DI. Entry point: bootstrap adapters, inject into services,
//! run the console input loop. No business logic here.

use dotenv::dotenv;
use jadwalbot::adapters::ai::{MockAiAdapter, OpenAiAdapter};
use jadwalbot::adapters::console::{ConsoleGateway, ConsoleInput};
use jadwalbot::adapters::persistence::SqliteStore;
use jadwalbot::adapters::ratelimit::Cooldown;
use jadwalbot::interpreter::Interpreter;
use jadwalbot::ports::{
    AiPort, ChatGateway, InputPort, RateLimiter, ReminderStore, ScheduleStore,
};
use jadwalbot::shared::AppConfig;
use jadwalbot::usecases::{Announcer, ChatService, CommandService, ReminderWorker};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_default();

    let data_dir = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_dir.display(), "data directory");

    // --- Persistence: one SQLite store backs both schedule and reminder ports ---
    let sqlite_store = Arc::new(
        SqliteStore::connect(&data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    let schedules: Arc<dyn ScheduleStore> = Arc::clone(&sqlite_store) as Arc<dyn ScheduleStore>;
    let reminders: Arc<dyn ReminderStore> = Arc::clone(&sqlite_store) as Arc<dyn ReminderStore>;

    // --- AI backend ---
    let ai: Arc<dyn AiPort> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI fallback enabled with OpenAI adapter"
        );
        Arc::new(OpenAiAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        ))
    } else {
        warn!("JADWALBOT_AI_API_KEY not set, using mock AI adapter");
        Arc::new(MockAiAdapter::new())
    };

    let limiter: Arc<dyn RateLimiter> = Arc::new(Cooldown::new(cfg.cooldown_secs_or_default()));
    let gateway: Arc<dyn ChatGateway> = Arc::new(ConsoleGateway);

    // --- Services ---
    let commands = Arc::new(CommandService::new(
        Arc::clone(&schedules),
        Arc::clone(&reminders),
    ));
    let chat = Arc::new(ChatService::new(
        Interpreter::new(),
        Arc::clone(&commands),
        Arc::clone(&schedules),
        ai,
        limiter,
    ));

    // --- Background workers ---
    let worker = ReminderWorker::new(
        Arc::clone(&reminders),
        Arc::clone(&gateway),
        Duration::from_secs(cfg.reminder_tick_secs_or_default()),
    );
    tokio::spawn(async move {
        worker.run().await;
    });

    if let Some(channel_id) = cfg.announce_channel_id {
        info!(channel_id, "daily schedule announcer enabled");
        let announcer = Announcer::new(
            Arc::clone(&schedules),
            Arc::clone(&gateway),
            channel_id,
            Duration::from_secs(cfg.announce_period_secs_or_default()),
        );
        tokio::spawn(async move {
            announcer.run().await;
        });
    }

    // --- Run (console loop until stdin closes) ---
    let input: Arc<dyn InputPort> = Arc::new(ConsoleInput::new(
        chat,
        cfg.console_user_id_or_default(),
        cfg.console_admin_or_default(),
    ));
    input.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
