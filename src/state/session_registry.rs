use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::UserId;
use crate::state::Session;

pub type SharedSession = Arc<Mutex<Session>>;

/// Per-user sessions, created lazily on first contact.
///
/// Holding a session's mutex serializes events of that user; other users
/// proceed in parallel.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, SharedSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, user_id: UserId) -> SharedSession {
        self.sessions
            .entry(user_id)
            .or_insert_with(|| {
                debug!("Created session for user {}", user_id);
                Arc::new(Mutex::new(Session::new(user_id)))
            })
            .clone()
    }

    pub async fn reset(&self, user_id: UserId) {
        let session = self.get_or_create(user_id);
        session.lock().await.reset();
    }

    /// Users that have talked to the bot since startup
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.sessions.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MenuState;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let registry = SessionRegistry::new();
        let a = registry.get_or_create(UserId(1));
        let b = registry.get_or_create(UserId(1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn reset_truncates_to_root() {
        let registry = SessionRegistry::new();
        {
            let session = registry.get_or_create(UserId(1));
            let mut session = session.lock().await;
            session.push(MenuState::Schedule);
            session.push(MenuState::TeamSchedule);
        }

        registry.reset(UserId(1)).await;

        let session = registry.get_or_create(UserId(1));
        let session = session.lock().await;
        assert_eq!(session.depth(), 1);
        assert_eq!(session.state(), MenuState::Root);
    }

    #[tokio::test]
    async fn concurrent_events_for_one_user_do_not_lose_updates() {
        let registry = Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let session = registry.get_or_create(UserId(9));
                let mut session = session.lock().await;
                session.push(MenuState::Voting);
                tokio::task::yield_now().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = registry.get_or_create(UserId(9));
        assert_eq!(session.lock().await.depth(), 17);
        assert_eq!(registry.user_ids(), vec![UserId(9)]);
    }
}
