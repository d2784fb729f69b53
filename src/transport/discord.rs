use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{Keyboard, Menu, Response, Transport, UserDirectory};
use crate::error::Result;
use crate::models::{ChatId, UserId};

const MENU_PREFIX: &str = "menu:";
const TEAM_PREFIX: &str = "team:";

// Discord component limits
const BUTTONS_PER_ROW: usize = 5;
const MAX_ROWS: usize = 5;

/// A decoded button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Press {
    /// Menu label, handled as if the user typed it
    Menu(String),
    /// Team pick in the schedule lookup
    Team(String),
}

impl Press {
    pub fn parse(custom_id: &str) -> Option<Self> {
        if let Some(label) = custom_id.strip_prefix(MENU_PREFIX) {
            Some(Press::Menu(label.to_string()))
        } else {
            custom_id
                .strip_prefix(TEAM_PREFIX)
                .map(|team| Press::Team(team.to_string()))
        }
    }
}

fn button(prefix: &str, label: &str) -> serenity::CreateButton {
    serenity::CreateButton::new(format!("{}{}", prefix, label))
        .label(label)
        .style(serenity::ButtonStyle::Secondary)
}

/// One action row per menu row
pub fn menu_components(menu: &Menu) -> Vec<serenity::CreateActionRow> {
    menu.rows
        .iter()
        .take(MAX_ROWS)
        .map(|row| {
            serenity::CreateActionRow::Buttons(
                row.iter()
                    .take(BUTTONS_PER_ROW)
                    .map(|label| button(MENU_PREFIX, label))
                    .collect(),
            )
        })
        .collect()
}

pub fn team_components(options: &[String]) -> Vec<serenity::CreateActionRow> {
    if options.len() > BUTTONS_PER_ROW * MAX_ROWS {
        warn!(
            "{} team buttons requested, only {} fit in a message",
            options.len(),
            BUTTONS_PER_ROW * MAX_ROWS
        );
    }
    options
        .chunks(BUTTONS_PER_ROW)
        .take(MAX_ROWS)
        .map(|row| {
            serenity::CreateActionRow::Buttons(
                row.iter().map(|team| button(TEAM_PREFIX, team)).collect(),
            )
        })
        .collect()
}

/// Components for a response, `None` when the keyboard stays as it is
pub fn components(keyboard: &Keyboard) -> Option<Vec<serenity::CreateActionRow>> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Menu(menu) => Some(menu_components(menu)),
        Keyboard::Inline(options) => Some(team_components(options)),
    }
}

/// Build a command reply from a core response
pub fn reply(response: &Response) -> poise::CreateReply {
    let reply = poise::CreateReply::default().content(response.text.clone());
    match components(&response.keyboard) {
        Some(rows) => reply.components(rows),
        None => reply,
    }
}

/// Transport over the Discord REST API
pub struct DiscordTransport {
    http: Arc<serenity::Http>,
}

impl DiscordTransport {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }

    async fn send(&self, chat_id: ChatId, message: serenity::CreateMessage) -> Result<()> {
        serenity::ChannelId::new(chat_id.0)
            .send_message(&self.http, message)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for DiscordTransport {
    async fn display_name(&self, _chat_id: ChatId, user_id: UserId) -> Option<String> {
        match self.http.get_user(serenity::UserId::new(user_id.0)).await {
            Ok(user) => Some(user.global_name.unwrap_or(user.name)),
            Err(e) => {
                debug!("Could not resolve user {}: {}", user_id, e);
                None
            }
        }
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<()> {
        let mut message = serenity::CreateMessage::new().content(text);
        if let Some(menu) = menu {
            message = message.components(menu_components(menu));
        }
        self.send(chat_id, message).await
    }

    async fn send_buttons(&self, chat_id: ChatId, prompt: &str, options: &[String]) -> Result<()> {
        let message = serenity::CreateMessage::new()
            .content(prompt)
            .components(team_components(options));
        self.send(chat_id, message).await
    }

    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<()> {
        let channel = serenity::UserId::new(user_id.0)
            .create_dm_channel(&self.http)
            .await?;
        channel
            .send_message(&self.http, serenity::CreateMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn send_sticker(&self, chat_id: ChatId, path: &Path) -> Result<()> {
        let attachment = serenity::CreateAttachment::path(path).await?;
        self.send(chat_id, serenity::CreateMessage::new().add_file(attachment))
            .await
    }
}
