use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::{BotError, Result};
use crate::models::{ChatId, UserId};
use crate::state::SharedRoster;
use crate::transport::{Response, UserDirectory};

/// Attendance answer for the next practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Attending,
    NotAttending,
}

impl Vote {
    pub fn label(self) -> &'static str {
        match self {
            Vote::Attending => "Буду",
            Vote::NotAttending => "Не буду",
        }
    }
}

/// Voters split by answer, as display names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub attending: Vec<String>,
    pub not_attending: Vec<String>,
}

impl Tally {
    pub fn render(&self) -> String {
        format!(
            "Будут участвовать:\n{}\n\nПропустят тренировку:\n{}",
            self.attending.join("\n"),
            self.not_attending.join("\n")
        )
    }
}

/// In-memory attendance votes of authorized users
pub struct VotingManager {
    roster: SharedRoster,
    votes: DashMap<UserId, Vote>,
}

impl VotingManager {
    pub fn new(roster: SharedRoster) -> Self {
        Self {
            roster,
            votes: DashMap::new(),
        }
    }

    /// Record (or overwrite) a user's vote
    pub fn record_vote(&self, user_id: UserId, vote: Vote) -> Response {
        if !self.roster.is_authorized(user_id) {
            debug!("Rejected vote from unauthorized user {}", user_id);
            return Response::text("Извините, у вас нет права голосовать.");
        }

        self.votes.insert(user_id, vote);
        info!("User {} voted '{}'", user_id, vote.label());
        Response::text("Ваш ответ записан. Нажмите кнопку «В главное меню»")
    }

    pub fn vote_of(&self, user_id: UserId) -> Option<Vote> {
        self.votes.get(&user_id).map(|v| *v)
    }

    pub fn clear_all(&self) {
        let cleared = self.votes.len();
        self.votes.clear();
        info!("Cleared {} votes", cleared);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Current votes for an authorized caller, voters in user id order
    pub async fn tally<D>(&self, caller: UserId, chat_id: ChatId, directory: &D) -> Result<Tally>
    where
        D: UserDirectory + ?Sized,
    {
        if !self.roster.is_authorized(caller) {
            return Err(BotError::PermissionDenied {
                message: format!("user {} may not view voting results", caller),
            });
        }

        // Snapshot first: no map guard may live across the name lookups
        let mut votes: Vec<(UserId, Vote)> =
            self.votes.iter().map(|e| (*e.key(), *e.value())).collect();
        votes.sort_by_key(|(user_id, _)| *user_id);

        let mut tally = Tally::default();
        for (user_id, vote) in votes {
            let name = match directory.display_name(chat_id, user_id).await {
                Some(name) => name,
                None => self
                    .roster
                    .user(user_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| user_id.to_string()),
            };
            match vote {
                Vote::Attending => tally.attending.push(name),
                Vote::NotAttending => tally.not_attending.push(name),
            }
        }
        Ok(tally)
    }
}
