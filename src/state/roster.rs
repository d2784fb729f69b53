use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{AuthorizedUser, Team, UserId};
use crate::state::Store;

/// Read-only snapshot of authorized users and teams, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: HashMap<UserId, AuthorizedUser>,
    teams: Vec<Team>,
}

impl Roster {
    pub fn new(users: Vec<AuthorizedUser>, teams: Vec<Team>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            teams,
        }
    }

    pub async fn load(store: &Store) -> Result<Self> {
        let users = store.load_authorized_users().await?;
        let teams = store.load_teams().await?;
        info!(
            "Loaded roster: {} authorized users, {} teams",
            users.len(),
            teams.len()
        );
        Ok(Self::new(users, teams))
    }

    pub fn is_authorized(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn user(&self, user_id: UserId) -> Option<&AuthorizedUser> {
        self.users.get(&user_id)
    }

    /// Authorized user ids in ascending order
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Team names for a selection keyboard, skipping `excluded`
    pub fn team_names_except(&self, excluded: Option<&Team>) -> Vec<String> {
        self.teams
            .iter()
            .filter(|t| excluded.map_or(true, |e| e.id != t.id))
            .map(|t| t.name.clone())
            .collect()
    }
}

pub type SharedRoster = Arc<Roster>;
