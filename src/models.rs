// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat platform user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Chat (channel) id that replies are delivered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A club member allowed to vote and view results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub id: UserId,
    pub name: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// One fixture between two teams, with the outcome once it is played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub date: String,
    pub time: String,
    pub result: Option<String>,
    pub winner: Option<String>,
    pub team1: String,
    pub team2: String,
}

impl ScheduleEntry {
    pub fn describe(&self) -> String {
        let mut text = format!("📅 Дата: {}\n⌛ Время: {}", self.date, self.time);
        if let Some(result) = &self.result {
            text.push_str(&format!(
                "\nРезультат встречи: {}\nПобедитель: {}",
                result,
                self.winner.as_deref().unwrap_or("-")
            ));
        }
        text
    }
}
