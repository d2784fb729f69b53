use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    #[error("Failed to load seed file '{path}': {source}")]
    SeedLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse seed file '{path}': {source}")]
    SeedParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // Store errors
    #[error("Failed to open store '{url}': {source}")]
    StoreOpen {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Store query '{operation}' failed: {source}")]
    StoreQuery {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Team not found: {name}")]
    TeamNotFound { name: String },

    // Permission errors
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // Weather errors
    #[error("{message}")]
    CityNotFound { message: String },

    #[error("Weather lookup failed: {message}")]
    Weather { message: String },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },
}

impl BotError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> BotError {
        move |source| BotError::StoreQuery { operation, source }
    }
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Weather {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

use poise::serenity_prelude as serenity;
