use crate::models::{ChatId, UserId};
use crate::transport::discord::reply;
use crate::{Context, Error};

/// Show who is coming to the next practice
#[poise::command(prefix_command, slash_command)]
pub async fn total_results(ctx: Context<'_>) -> Result<(), Error> {
    let response = ctx
        .data()
        .dispatcher
        .total_results(UserId(ctx.author().id.get()), ChatId(ctx.channel_id().get()))
        .await;

    ctx.send(reply(&response)).await?;
    Ok(())
}
