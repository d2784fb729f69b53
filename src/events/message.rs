use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use crate::models::{ChatId, UserId};
use crate::transport::Transport;
use crate::{Data, Error, COMMAND_PREFIX};

/// Handle incoming messages
pub async fn handle_message(
    _ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages
    if msg.author.bot {
        return Ok(());
    }

    // The bot only converses in DMs
    if msg.guild_id.is_some() {
        return Ok(());
    }

    // Commands are handled by the framework
    if msg.content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    debug!("Processing DM from: {}", msg.author.name);
    let chat_id = ChatId(msg.channel_id.get());
    let responses = data
        .dispatcher
        .on_text(UserId(msg.author.id.get()), chat_id, &msg.content)
        .await;

    for response in &responses {
        if let Err(e) = data.transport.deliver(chat_id, response).await {
            error!("Failed to reply to {}: {}", msg.author.name, e);
        }
    }
    Ok(())
}
