use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

mod commands;
mod config;
mod error;
mod events;
mod managers;
mod models;
mod state;
mod transport;

#[cfg(test)]
mod test_support;

use commands::{help, send_all, start, stop, total_results};
use config::{Args, BotConfig, SeedData};
use events::{handle_component, handle_message};
use managers::{Dispatcher, OpenWeatherClient, Scheduler, SharedWeatherService};
use state::{Roster, Store};
use transport::DiscordTransport;

pub const COMMAND_PREFIX: &str = "/";

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared application state
pub struct Data {
    pub dispatcher: Arc<Dispatcher>,
    pub transport: Arc<DiscordTransport>,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if let Err(e) = handle_message(ctx, new_message, data).await {
                error!("Failed to handle message: {}", e);
            }
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => {
            if let Err(e) = handle_component(ctx, component, data).await {
                error!("Failed to handle button press: {}", e);
            }
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    let config = BotConfig::from_args(args)?;

    info!("Opening database {}...", config.database_url);
    let store = Store::open(&config.database_url).await?;

    if let Some(seed_path) = &config.seed {
        info!("Importing seed data from {}...", seed_path.display());
        let seed = SeedData::load_from_file(seed_path)?;
        store.import_seed(&seed).await?;
    }

    let roster = Arc::new(Roster::load(&store).await?);

    let weather: Option<SharedWeatherService> = match &config.weather_api_key {
        Some(key) => Some(Arc::new(OpenWeatherClient::new(key)?)),
        None => {
            warn!("OPENWEATHER_API_KEY not set, weather forecast disabled");
            None
        }
    };

    let setup_config = config.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![start(), send_all(), total_results(), help(), stop()],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.into()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {})",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
                            let _ = ctx.say("Произошла ошибка, попробуйте позже.").await;
                        }
                        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
                            error!("Argument parse error in '{}': {} (input: {:?})", ctx.command().qualified_name, error, input);
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot logged in as: {}", ready.user.name);

                let transport = Arc::new(DiscordTransport::new(ctx.http.clone()));
                let mut dispatcher = Dispatcher::new(
                    store,
                    roster,
                    transport.clone(),
                    setup_config.admin_id,
                );
                if let Some(weather) = weather {
                    dispatcher = dispatcher.with_weather(weather);
                }
                if let Some(sticker) = setup_config.sticker.clone() {
                    dispatcher = dispatcher.with_sticker(sticker);
                }
                let dispatcher = Arc::new(dispatcher);

                let scheduler = Scheduler::new(setup_config.reminder_at, setup_config.vote_reset_at);
                tokio::spawn(scheduler.run(dispatcher.clone()));

                if let Some(gid) = setup_config.guild_id {
                    let guild_id = serenity::GuildId::new(gid);
                    info!("Registering commands to guild: {}", guild_id);
                    if let Err(e) = poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        guild_id,
                    ).await {
                        error!("Failed to register commands for guild {}: {}", guild_id, e);
                    }
                } else {
                    info!("Registering commands globally...");
                    if let Err(e) = poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    ).await {
                        error!("Failed to register commands globally: {}", e);
                    } else {
                        info!("Successfully registered {} commands globally (may take up to 1 hour to propagate)",
                              framework.options().commands.len());
                    }
                }

                Ok(Data {
                    dispatcher,
                    transport,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("Enable the MESSAGE_CONTENT privileged intent in the Discord Developer Portal");
            return Err(anyhow::anyhow!("Disallowed gateway intents: MESSAGE_CONTENT"));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
