use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::models::{ChatId, UserId};
use crate::transport::discord::reply;
use crate::{Context, Error};

/// Open the main menu
#[poise::command(prefix_command, slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    let author = ctx.author();
    let first_name = author.global_name.clone().unwrap_or_else(|| author.name.clone());

    let responses = ctx
        .data()
        .dispatcher
        .on_start(
            UserId(author.id.get()),
            ChatId(ctx.channel_id().get()),
            &first_name,
        )
        .await;

    for response in &responses {
        ctx.send(reply(response)).await?;
    }
    Ok(())
}

/// Show help information
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("Команды бота")
        .description("Доступные команды:")
        .field("/start", "Открыть главное меню", false)
        .field("/total_results", "Итоги голосования", false)
        .field("/send_all", "Сообщение всем пользователям (администратор)", false)
        .field("/stop", "Остановить бота (администратор)", false)
        .color(0x3498db);

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true)).await?;
    Ok(())
}

/// Shut the bot down
#[poise::command(prefix_command, slash_command)]
pub async fn stop(ctx: Context<'_>) -> Result<(), Error> {
    if !ctx.data().dispatcher.is_admin(UserId(ctx.author().id.get())) {
        warn!("User {} tried /stop", ctx.author().name);
        ctx.say("У вас нет доступа к этой команде.").await?;
        return Ok(());
    }

    info!("Shutdown requested by {}", ctx.author().name);
    ctx.say("Бот остановлен.").await?;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
