//! Outbound side of the bot: what the core asks the chat platform to show.

pub mod discord;

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::models::{ChatId, UserId};

pub use discord::DiscordTransport;

/// Reply keyboard: rows of labels that are sent back as text when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<String>>,
}

impl Menu {
    /// Lay `options` out `per_row` to a row, with an optional trailing row
    pub fn grid(options: &[&str], per_row: usize, last: Option<&str>) -> Self {
        let mut rows: Vec<Vec<String>> = options
            .chunks(per_row.max(1))
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        if let Some(last) = last {
            rows.push(vec![last.to_string()]);
        }
        Self { rows }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever the user currently sees
    Keep,
    Menu(Menu),
    /// Buttons whose presses come back as callbacks
    Inline(Vec<String>),
}

/// A message the core wants shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Menu(menu),
        }
    }

    pub fn with_buttons(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Inline(options),
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        match &self.keyboard {
            Keyboard::Menu(menu) => Some(menu),
            _ => None,
        }
    }
}

/// Resolves a user id to the name shown in vote tallies
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, chat_id: ChatId, user_id: UserId) -> Option<String>;
}

/// Chat platform the bot talks through
#[async_trait]
pub trait Transport: UserDirectory {
    async fn send_text(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<()>;

    async fn send_buttons(&self, chat_id: ChatId, prompt: &str, options: &[String]) -> Result<()>;

    /// Private message to a user, used for broadcasts
    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<()>;

    async fn send_sticker(&self, chat_id: ChatId, path: &Path) -> Result<()>;

    async fn deliver(&self, chat_id: ChatId, response: &Response) -> Result<()> {
        match &response.keyboard {
            Keyboard::Keep => self.send_text(chat_id, &response.text, None).await,
            Keyboard::Menu(menu) => self.send_text(chat_id, &response.text, Some(menu)).await,
            Keyboard::Inline(options) => self.send_buttons(chat_id, &response.text, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let menu = Menu::grid(&["Среда", "Пятница", "Воскресенье"], 2, Some("В главное меню"));
        assert_eq!(
            menu.rows,
            vec![
                vec!["Среда".to_string(), "Пятница".to_string()],
                vec!["Воскресенье".to_string()],
                vec!["В главное меню".to_string()],
            ]
        );
        assert_eq!(menu.labels().count(), 4);
    }
}
