use tracing::{debug, error, info};

use crate::state::{MenuState, Session, SharedRoster, Store};
use crate::transport::Response;

const NOT_FOUND: &str = "Информация о матче не найдена.";
const STORE_UNAVAILABLE: &str = "Не удалось получить данные о матче, попробуйте позже.";

/// Two-step "team vs team" lookup on top of the session's lookup frame
pub struct ScheduleLookup {
    store: Store,
    roster: SharedRoster,
}

impl ScheduleLookup {
    pub fn new(store: Store, roster: SharedRoster) -> Self {
        Self { store, roster }
    }

    /// Apply a team button press.
    ///
    /// Returns `None` when the press does not fit the session (no lookup in
    /// progress, unknown team); the session is then reset to the root menu.
    pub async fn select_team(&self, session: &mut Session, team_name: &str) -> Option<Response> {
        if session.depth() < 2 || session.state() != MenuState::ScheduleLookup {
            debug!(
                "Team '{}' pressed outside a lookup by {}, resetting",
                team_name,
                session.user_id()
            );
            session.reset();
            return None;
        }

        let Some(team) = self.roster.team_by_name(team_name).cloned() else {
            debug!("Unknown team '{}' from {}, resetting", team_name, session.user_id());
            session.reset();
            return None;
        };

        let first = match session.top().slots.first.clone() {
            None => {
                let prompt = Response::with_buttons(
                    "Выберите вторую команду:",
                    self.roster.team_names_except(Some(&team)),
                );
                session.top_mut().slots.first = Some(team);
                return Some(prompt);
            }
            Some(first) if first.id == team.id => {
                return Some(Response::with_buttons(
                    "Выберите вторую команду:",
                    self.roster.team_names_except(Some(&first)),
                ));
            }
            Some(first) => first,
        };
        session.top_mut().slots.second = Some(team.clone());

        let text = match self.store.find_schedule_entry(&first, &team).await {
            Ok(Some(entry)) => {
                info!("Lookup {} vs {}: {} {}", first.name, team.name, entry.date, entry.time);
                entry.describe()
            }
            Ok(None) => NOT_FOUND.to_string(),
            Err(e) => {
                error!("Lookup {} vs {} failed: {}", first.name, team.name, e);
                STORE_UNAVAILABLE.to_string()
            }
        };

        session.top_mut().slots.clear();
        Some(Response::with_buttons(text, self.roster.team_names_except(None)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::test_support::{seeded_store, ANNA};
    use crate::transport::Keyboard;

    async fn lookup() -> ScheduleLookup {
        let (store, roster) = seeded_store().await;
        ScheduleLookup::new(store, roster)
    }

    fn in_lookup() -> Session {
        let mut session = Session::new(ANNA);
        session.push(MenuState::Competitions);
        session.push(MenuState::Championship);
        session.push(MenuState::ScheduleLookup);
        session
    }

    fn options(response: &Response) -> Vec<String> {
        match &response.keyboard {
            Keyboard::Inline(options) => options.clone(),
            other => panic!("expected inline buttons, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn first_pick_excludes_team_from_second_prompt() {
        let lookup = lookup().await;
        let mut session = in_lookup();

        let response = lookup.select_team(&mut session, "Каравелла").await.unwrap();

        assert_eq!(response.text, "Выберите вторую команду:");
        assert_eq!(options(&response), vec!["Северянка", "Поморье"]);
        assert_eq!(
            session.top().slots.first.as_ref().map(|t| t.name.as_str()),
            Some("Каравелла")
        );
    }

    #[tokio::test]
    async fn completed_lookup_rearms_with_full_team_list() {
        let lookup = lookup().await;
        let mut session = in_lookup();
        let depth = session.depth();

        lookup.select_team(&mut session, "Каравелла").await.unwrap();
        let response = lookup.select_team(&mut session, "Северянка").await.unwrap();

        assert!(response.text.starts_with("📅 Дата: 2024-03-01"));
        assert!(response.text.contains("Победитель: Каравелла"));
        assert_eq!(options(&response), vec!["Каравелла", "Северянка", "Поморье"]);
        assert!(session.top().slots.is_empty());
        assert_eq!(session.depth(), depth);
        assert_eq!(session.state(), MenuState::ScheduleLookup);
    }

    #[tokio::test]
    async fn pair_order_does_not_matter() {
        let lookup = lookup().await;

        let mut forward = in_lookup();
        lookup.select_team(&mut forward, "Каравелла").await;
        let a = lookup.select_team(&mut forward, "Северянка").await.unwrap();

        let mut backward = in_lookup();
        lookup.select_team(&mut backward, "Северянка").await;
        let b = lookup.select_team(&mut backward, "Каравелла").await.unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn missing_fixture_reports_not_found_and_resets_slots() {
        let lookup = lookup().await;
        let mut session = in_lookup();

        lookup.select_team(&mut session, "Каравелла").await;
        let response = lookup.select_team(&mut session, "Поморье").await.unwrap();

        assert_eq!(response.text, NOT_FOUND);
        assert!(session.top().slots.is_empty());
    }

    #[tokio::test]
    async fn same_team_twice_asks_again() {
        let lookup = lookup().await;
        let mut session = in_lookup();

        lookup.select_team(&mut session, "Каравелла").await;
        let response = lookup.select_team(&mut session, "Каравелла").await.unwrap();

        assert_eq!(response.text, "Выберите вторую команду:");
        assert!(session.top().slots.second.is_none());
        assert!(session.top().slots.first.is_some());
    }

    #[tokio::test]
    async fn press_outside_lookup_resets_silently() {
        let lookup = lookup().await;
        let mut session = Session::new(UserId(1));
        session.push(MenuState::Voting);

        assert!(lookup.select_team(&mut session, "Каравелла").await.is_none());
        assert_eq!(session.depth(), 1);
        assert_eq!(session.state(), MenuState::Root);
    }

    #[tokio::test]
    async fn unknown_team_resets_silently() {
        let lookup = lookup().await;
        let mut session = in_lookup();

        assert!(lookup.select_team(&mut session, "Нигде").await.is_none());
        assert_eq!(session.state(), MenuState::Root);
    }

    #[tokio::test]
    async fn store_failure_is_reported_and_rearms() {
        let (store, roster) = seeded_store().await;
        let lookup = ScheduleLookup::new(store.clone(), roster);
        let mut session = in_lookup();

        lookup.select_team(&mut session, "Каравелла").await;
        store.close().await;
        let response = lookup.select_team(&mut session, "Северянка").await.unwrap();

        assert_eq!(response.text, STORE_UNAVAILABLE);
        assert!(session.top().slots.is_empty());
    }
}
