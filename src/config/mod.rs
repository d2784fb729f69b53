pub mod bot_config;
pub mod seed;

pub use bot_config::{Args, BotConfig};
pub use seed::{SeedData, SeedMatch, SeedUser};
