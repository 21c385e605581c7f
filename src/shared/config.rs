//! Application configuration. Data paths, AI credentials, scheduling knobs.

use serde::Deserialize;

/// Default cooldown between AI fallback calls per user, in seconds.
pub const DEFAULT_COOLDOWN_SECS: i64 = 10;

/// Default poll interval of the reminder worker, in seconds.
pub const DEFAULT_REMINDER_TICK_SECS: u64 = 15;

/// Default interval between daily-schedule announcements, in seconds.
pub const DEFAULT_ANNOUNCE_PERIOD_SECS: u64 = 86_400;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory for the SQLite database. Read from JADWALBOT_DATA_DIR.
    pub data_dir: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Backend Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// AI API key (e.g., OpenAI). Read from JADWALBOT_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// AI API URL. Defaults to OpenAI. Read from JADWALBOT_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// AI model name. Defaults to "gpt-4o-mini". Read from JADWALBOT_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Per-user cooldown for AI fallback, in seconds. Read from
    /// JADWALBOT_COOLDOWN_SECS.
    #[serde(default)]
    pub cooldown_secs: Option<i64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Background Workers
    // ─────────────────────────────────────────────────────────────────────────
    /// Reminder worker poll interval in seconds (default 15). Read from
    /// JADWALBOT_REMINDER_TICK_SECS.
    #[serde(default)]
    pub reminder_tick_secs: Option<u64>,

    /// Channel to post daily schedule announcements to. Announcer is off
    /// when unset. Read from JADWALBOT_ANNOUNCE_CHANNEL_ID.
    #[serde(default)]
    pub announce_channel_id: Option<i64>,

    /// Interval between announcements in seconds (default 86400). Read from
    /// JADWALBOT_ANNOUNCE_PERIOD_SECS.
    #[serde(default)]
    pub announce_period_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Console Front-End
    // ─────────────────────────────────────────────────────────────────────────
    /// User id assumed for console input (default 1). Read from
    /// JADWALBOT_CONSOLE_USER_ID.
    #[serde(default)]
    pub console_user_id: Option<i64>,

    /// Whether the console user gets admin commands (default true). Read
    /// from JADWALBOT_CONSOLE_ADMIN.
    #[serde(default)]
    pub console_admin: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("JADWALBOT"));
        if let Ok(path) = std::env::var("JADWALBOT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the database directory. Defaults to "./data".
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| "./data".to_string())
    }

    /// Returns the per-user AI cooldown in seconds.
    pub fn cooldown_secs_or_default(&self) -> i64 {
        self.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS)
    }

    /// Returns the reminder worker poll interval in seconds.
    pub fn reminder_tick_secs_or_default(&self) -> u64 {
        self.reminder_tick_secs.unwrap_or(DEFAULT_REMINDER_TICK_SECS)
    }

    /// Returns the announcement interval in seconds.
    pub fn announce_period_secs_or_default(&self) -> u64 {
        self.announce_period_secs
            .unwrap_or(DEFAULT_ANNOUNCE_PERIOD_SECS)
    }

    /// Returns the console user id. Defaults to 1.
    pub fn console_user_id_or_default(&self) -> i64 {
        self.console_user_id.unwrap_or(1)
    }

    /// Returns whether the console user is an admin. Defaults to true.
    pub fn console_admin_or_default(&self) -> bool {
        self.console_admin.unwrap_or(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the AI API key if configured. Reads from config or
    /// JADWALBOT_AI_API_KEY env.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("JADWALBOT_AI_API_KEY").ok())
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .or_else(|| std::env::var("JADWALBOT_AI_API_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .or_else(|| std::env::var("JADWALBOT_AI_MODEL").ok())
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    /// Returns true if AI is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }
}
