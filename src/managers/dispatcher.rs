use chrono::{Local, Weekday};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::BotError;
use crate::managers::menu;
use crate::managers::navigation::{NavigationEngine, Step};
use crate::managers::schedule_lookup::ScheduleLookup;
use crate::managers::scheduler::is_practice_day;
use crate::managers::voting_manager::VotingManager;
use crate::managers::weather::SharedWeatherService;
use crate::models::{ChatId, UserId};
use crate::state::{Session, SessionRegistry, SharedRoster, Store};
use crate::transport::{Response, Transport};

const REMINDER: &str = "Пройдите опрос: нажмите кнопку «Голосование».";
const RESULTS_DENIED: &str = "Невозможно просмотреть результаты";
const WEATHER_FAILED: &str = "Не удалось получить данные о погоде";
const WEATHER_DISABLED: &str = "Прогноз погоды сейчас недоступен.";

/// Entry point for every inbound event and scheduled job
pub struct Dispatcher {
    admin_id: UserId,
    roster: SharedRoster,
    sessions: SessionRegistry,
    navigation: NavigationEngine,
    voting: VotingManager,
    lookup: ScheduleLookup,
    weather: Option<SharedWeatherService>,
    transport: Arc<dyn Transport>,
    sticker: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(
        store: Store,
        roster: SharedRoster,
        transport: Arc<dyn Transport>,
        admin_id: UserId,
    ) -> Self {
        Self {
            admin_id,
            sessions: SessionRegistry::new(),
            navigation: NavigationEngine::new(roster.clone()),
            voting: VotingManager::new(roster.clone()),
            lookup: ScheduleLookup::new(store, roster.clone()),
            roster,
            weather: None,
            transport,
            sticker: None,
        }
    }

    pub fn with_weather(mut self, weather: SharedWeatherService) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_sticker(mut self, sticker: PathBuf) -> Self {
        self.sticker = Some(sticker);
        self
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.admin_id
    }

    /// `/start`: back to the root menu with a greeting
    pub async fn on_start(&self, user_id: UserId, chat_id: ChatId, first_name: &str) -> Vec<Response> {
        self.sessions.reset(user_id).await;
        info!("User {} ({}) started a session", user_id, first_name);

        if let Some(sticker) = &self.sticker {
            if let Err(e) = self.transport.send_sticker(chat_id, sticker).await {
                warn!("Failed to send sticker to chat {}: {}", chat_id, e);
            }
        }

        vec![Response::with_menu(
            format!("Привет, {}! Нажмите на кнопку ниже 👇", first_name),
            menu::root_menu(),
        )]
    }

    /// Text typed or a menu button pressed
    pub async fn on_text(&self, user_id: UserId, chat_id: ChatId, text: &str) -> Vec<Response> {
        let session = self.sessions.get_or_create(user_id);
        let mut session = session.lock().await;

        match self.navigation.handle(&mut session, text) {
            Step::Show(response) => vec![response],
            Step::Vote(vote) => vec![self.voting.record_vote(user_id, vote)],
            Step::Tally => vec![self.tally(&mut session, chat_id).await],
            Step::Weather(city) => match &self.weather {
                Some(weather) => {
                    self.spawn_weather(weather.clone(), chat_id, city);
                    Vec::new()
                }
                None => vec![Response::text(WEATHER_DISABLED)],
            },
        }
    }

    /// Team button pressed in the lookup flow
    pub async fn on_callback(&self, user_id: UserId, _chat_id: ChatId, data: &str) -> Vec<Response> {
        let session = self.sessions.get_or_create(user_id);
        let mut session = session.lock().await;

        self.lookup
            .select_team(&mut session, data)
            .await
            .into_iter()
            .collect()
    }

    /// `/total_results`
    pub async fn total_results(&self, user_id: UserId, chat_id: ChatId) -> Response {
        let session = self.sessions.get_or_create(user_id);
        let mut session = session.lock().await;
        self.tally(&mut session, chat_id).await
    }

    /// `/send_all <text>`: admin message to everyone who has used the bot
    pub async fn send_all(&self, caller: UserId, text: &str) -> Response {
        if !self.is_admin(caller) {
            warn!("User {} tried /send_all", caller);
            return Response::text("У вас нет доступа к этой команде.");
        }

        let text = text.trim();
        if text.is_empty() {
            return Response::text("Использование: /send_all <текст сообщения>");
        }

        let recipients = self.sessions.user_ids();
        let delivered = self.fan_out(&recipients, text).await;
        info!("Admin broadcast delivered to {}/{} users", delivered, recipients.len());
        Response::text("Сообщение отправлено всем пользователям.")
    }

    /// Scheduled voting reminder to every authorized user
    pub async fn broadcast_reminder(&self) {
        let recipients = self.roster.user_ids();
        let delivered = self.fan_out(&recipients, REMINDER).await;
        info!("Voting reminder delivered to {}/{} users", delivered, recipients.len());
    }

    /// Clear votes when `weekday` is a practice day; returns whether it did
    pub fn clear_votes_if_scheduled_day(&self, weekday: Weekday) -> bool {
        if !is_practice_day(weekday) {
            debug!("{:?} is not a practice day, keeping votes", weekday);
            return false;
        }
        self.voting.clear_all();
        true
    }

    async fn tally(&self, session: &mut Session, chat_id: ChatId) -> Response {
        match self
            .voting
            .tally(session.user_id(), chat_id, self.transport.as_ref())
            .await
        {
            Ok(tally) => Response::text(tally.render()),
            Err(e) => {
                debug!("Tally refused: {}", e);
                session.reset();
                Response::text(RESULTS_DENIED)
            }
        }
    }

    async fn fan_out(&self, recipients: &[UserId], text: &str) -> usize {
        let results = join_all(
            recipients
                .iter()
                .map(|user_id| self.transport.send_direct(*user_id, text)),
        )
        .await;

        results
            .iter()
            .zip(recipients)
            .filter(|(result, user_id)| match result {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to message user {}: {}", user_id, e);
                    false
                }
            })
            .count()
    }

    fn spawn_weather(&self, weather: SharedWeatherService, chat_id: ChatId, city: String) {
        let transport = self.transport.clone();
        tokio::spawn(async move {
            let text = match weather.current(&city).await {
                Ok(report) => report.render(Local::now().naive_local()),
                Err(BotError::CityNotFound { message }) => message,
                Err(e) => {
                    error!("Weather lookup for '{}' failed: {}", city, e);
                    WEATHER_FAILED.to_string()
                }
            };
            if let Err(e) = transport.send_text(chat_id, &text, None).await {
                error!("Failed to deliver weather to chat {}: {}", chat_id, e);
            }
        });
    }

    #[cfg(test)]
    pub(crate) fn voting(&self) -> &VotingManager {
        &self.voting
    }

    #[cfg(test)]
    pub(crate) async fn depth(&self, user_id: UserId) -> usize {
        self.sessions.get_or_create(user_id).lock().await.depth()
    }
}
