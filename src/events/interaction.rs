use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use crate::models::{ChatId, UserId};
use crate::transport::discord::Press;
use crate::transport::Transport;
use crate::{Data, Error};

/// Handle a button press on one of the bot's messages
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let Some(press) = Press::parse(&component.data.custom_id) else {
        debug!("Ignoring unknown component '{}'", component.data.custom_id);
        return Ok(());
    };

    component
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Acknowledge)
        .await?;

    let user_id = UserId(component.user.id.get());
    let chat_id = ChatId(component.channel_id.get());
    let responses = match press {
        Press::Menu(label) => data.dispatcher.on_text(user_id, chat_id, &label).await,
        Press::Team(team) => data.dispatcher.on_callback(user_id, chat_id, &team).await,
    };

    for response in &responses {
        if let Err(e) = data.transport.deliver(chat_id, response).await {
            error!("Failed to answer button press from {}: {}", component.user.name, e);
        }
    }
    Ok(())
}
