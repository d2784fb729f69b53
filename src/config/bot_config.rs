use chrono::NaiveTime;
use clap::Parser;
use std::path::PathBuf;

use crate::error::{BotError, Result};
use crate::models::UserId;

/// Volleyball club assistant: practice schedule, attendance voting and match results
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Bot token
    #[arg(long, env = "VOLLEY_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// User ID allowed to run /send_all and /stop
    #[arg(long, env = "VOLLEY_BOT_ADMIN")]
    pub admin_id: u64,

    /// SQLite database with users, teams and the match schedule
    #[arg(long, env = "VOLLEY_BOT_DB", default_value = "sqlite://volley_bot.db")]
    pub database_url: String,

    /// OpenWeatherMap API key (weather forecast is disabled without it)
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_api_key: Option<String>,

    /// Sticker image sent on /start
    #[arg(long, env = "VOLLEY_BOT_STICKER")]
    pub sticker: Option<PathBuf>,

    /// Local time (HH:MM) of the voting reminder on practice days
    #[arg(long, default_value = "10:00")]
    pub reminder_time: String,

    /// Local time (HH:MM) at which votes are cleared on practice days
    #[arg(long, default_value = "00:00")]
    pub vote_reset_time: String,

    /// JSON file imported into the database before startup
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Register commands in this guild only (faster for testing)
    #[arg(long)]
    pub guild_id: Option<u64>,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub admin_id: UserId,
    pub database_url: String,
    pub weather_api_key: Option<String>,
    pub sticker: Option<PathBuf>,
    pub reminder_at: NaiveTime,
    pub vote_reset_at: NaiveTime,
    pub seed: Option<PathBuf>,
    pub guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let token = args.bot_token.trim().to_string();
        if token.is_empty() {
            return Err(BotError::ConfigValidation {
                message: "bot token is empty".to_string(),
            });
        }

        Ok(Self {
            token,
            admin_id: UserId(args.admin_id),
            database_url: args.database_url,
            weather_api_key: args
                .weather_api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            sticker: args.sticker,
            reminder_at: parse_time("reminder-time", &args.reminder_time)?,
            vote_reset_at: parse_time("vote-reset-time", &args.vote_reset_time)?,
            seed: args.seed,
            guild_id: args.guild_id,
        })
    }
}

fn parse_time(option: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| BotError::ConfigValidation {
        message: format!("--{} expects HH:MM, got '{}': {}", option, value, e),
    })
}
