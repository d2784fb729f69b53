use crate::models::UserId;
use crate::transport::discord::reply;
use crate::{Context, Error};

/// Send a message to everyone who has used the bot (admin only)
#[poise::command(prefix_command, slash_command)]
pub async fn send_all(
    ctx: Context<'_>,
    #[description = "Текст сообщения"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let response = ctx
        .data()
        .dispatcher
        .send_all(UserId(ctx.author().id.get()), text.as_deref().unwrap_or(""))
        .await;

    ctx.send(reply(&response).ephemeral(true)).await?;
    Ok(())
}
