//! Fixtures and fakes shared by unit tests.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::{SeedData, SeedMatch, SeedUser};
use crate::error::{BotError, Result};
use crate::managers::weather::{WeatherReport, WeatherService};
use crate::models::{AuthorizedUser, ChatId, Team, UserId};
use crate::state::{Roster, SharedRoster, Store};
use crate::transport::{Menu, Transport, UserDirectory};

pub const ANNA: UserId = UserId(1);
pub const BORIS: UserId = UserId(2);
pub const STRANGER: UserId = UserId(99);
pub const ADMIN: UserId = UserId(1000);

pub const TEAMS: [&str; 3] = ["Каравелла", "Северянка", "Поморье"];

pub fn roster() -> Roster {
    Roster::new(
        vec![
            AuthorizedUser {
                id: ANNA,
                name: "Анна".to_string(),
                nickname: "anna".to_string(),
            },
            AuthorizedUser {
                id: BORIS,
                name: "Борис".to_string(),
                nickname: "boris".to_string(),
            },
        ],
        TEAMS
            .iter()
            .enumerate()
            .map(|(i, name)| Team {
                id: i as i64 + 1,
                name: name.to_string(),
            })
            .collect(),
    )
}

/// In-memory store with the fixture roster and two Каравелла–Северянка fixtures
pub async fn seeded_store() -> (Store, SharedRoster) {
    let store = Store::open("sqlite::memory:").await.expect("db");
    let seed = SeedData {
        users: vec![
            SeedUser {
                id: ANNA.0,
                name: "Анна".to_string(),
                nickname: "anna".to_string(),
                allowed: true,
            },
            SeedUser {
                id: BORIS.0,
                name: "Борис".to_string(),
                nickname: "boris".to_string(),
                allowed: true,
            },
            SeedUser {
                id: STRANGER.0,
                name: "Гость".to_string(),
                nickname: String::new(),
                allowed: false,
            },
        ],
        teams: TEAMS.iter().map(|t| t.to_string()).collect(),
        schedule: vec![
            SeedMatch {
                date: "2024-03-01".to_string(),
                time: "19:00".to_string(),
                result: Some("3:1".to_string()),
                winner: Some("Каравелла".to_string()),
                team1: "Каравелла".to_string(),
                team2: "Северянка".to_string(),
            },
            SeedMatch {
                date: "2024-04-12".to_string(),
                time: "18:30".to_string(),
                result: None,
                winner: None,
                team1: "Северянка".to_string(),
                team2: "Каравелла".to_string(),
            },
        ],
    };
    store.import_seed(&seed).await.expect("seed");
    let roster = Roster::load(&store).await.expect("roster");
    (store, Arc::new(roster))
}

/// Names for the vote tally, unknown users resolve to `None`
#[derive(Default)]
pub struct StaticDirectory {
    names: HashMap<UserId, String>,
}

impl StaticDirectory {
    pub fn with(names: &[(UserId, &str)]) -> Self {
        Self {
            names: names.iter().map(|(id, n)| (*id, n.to_string())).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn display_name(&self, _chat_id: ChatId, user_id: UserId) -> Option<String> {
        self.names.get(&user_id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
        menu: Option<Menu>,
    },
    Buttons {
        chat: ChatId,
        prompt: String,
        options: Vec<String>,
    },
    Direct {
        user: UserId,
        text: String,
    },
    Sticker {
        chat: ChatId,
    },
}

/// Transport that records everything it is asked to send
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    unreachable: HashSet<UserId>,
}

impl RecordingTransport {
    /// Direct messages to these users fail
    pub fn with_unreachable(users: &[UserId]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            unreachable: users.iter().copied().collect(),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    /// Wait for a message sent from a spawned task
    pub async fn wait_for_text(&self, chat: ChatId) -> String {
        for _ in 0..200 {
            let found = self.sent().into_iter().find_map(|s| match s {
                Sent::Text { chat: c, text, .. } if c == chat => Some(text),
                _ => None,
            });
            if let Some(text) = found {
                return text;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("nothing was sent to chat {}", chat);
    }
}

#[async_trait]
impl UserDirectory for RecordingTransport {
    async fn display_name(&self, _chat_id: ChatId, _user_id: UserId) -> Option<String> {
        None
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str, menu: Option<&Menu>) -> Result<()> {
        self.record(Sent::Text {
            chat: chat_id,
            text: text.to_string(),
            menu: menu.cloned(),
        });
        Ok(())
    }

    async fn send_buttons(&self, chat_id: ChatId, prompt: &str, options: &[String]) -> Result<()> {
        self.record(Sent::Buttons {
            chat: chat_id,
            prompt: prompt.to_string(),
            options: options.to_vec(),
        });
        Ok(())
    }

    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<()> {
        if self.unreachable.contains(&user_id) {
            return Err(BotError::Discord {
                message: format!("cannot message {}", user_id),
            });
        }
        self.record(Sent::Direct {
            user: user_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_sticker(&self, chat_id: ChatId, _path: &Path) -> Result<()> {
        self.record(Sent::Sticker { chat: chat_id });
        Ok(())
    }
}

/// Weather for "Архангельск", not-found for "Нигде", an HTTP failure otherwise
pub struct StubWeather;

#[async_trait]
impl WeatherService for StubWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        match city {
            "Архангельск" => {
                let utc = |secs: i64| {
                    DateTime::<Utc>::from_timestamp(secs, 0)
                        .unwrap()
                        .with_timezone(&FixedOffset::east_opt(0).unwrap())
                };
                Ok(WeatherReport {
                    city: city.to_string(),
                    temperature: 1.2,
                    feels_like: -2.0,
                    temp_min: 0.0,
                    temp_max: 2.0,
                    humidity: 80.0,
                    wind_speed: 3.0,
                    condition: "Clear".to_string(),
                    sunrise: utc(1_709_269_200),
                    sunset: utc(1_709_305_200),
                })
            }
            "Нигде" => Err(BotError::CityNotFound {
                message: "city not found".to_string(),
            }),
            _ => Err(BotError::Weather {
                message: "connection refused".to_string(),
            }),
        }
    }
}
