use tracing::debug;

use crate::managers::menu::{self, action_for, screen, Action, Options};
use crate::managers::voting_manager::Vote;
use crate::state::{MenuState, Session, SharedRoster};
use crate::transport::Response;

const NOT_UNDERSTOOD: &str = "Я Вас не понимаю, попробуйте выбрать иное";

/// What the dispatcher should do with an incoming text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Show(Response),
    Vote(Vote),
    Tally,
    /// City name typed in the weather prompt
    Weather(String),
}

/// Interprets text against the session's position in the menu tree
pub struct NavigationEngine {
    roster: SharedRoster,
}

impl NavigationEngine {
    pub fn new(roster: SharedRoster) -> Self {
        Self { roster }
    }

    pub fn handle(&self, session: &mut Session, text: &str) -> Step {
        let Some(action) = action_for(text) else {
            return self.free_text(session, text);
        };

        match action {
            Action::Home => {
                session.reset();
                Step::Show(self.show(MenuState::Root))
            }
            Action::Enter(state) => {
                session.push(state);
                debug!("User {} entered {:?} (depth {})", session.user_id(), state, session.depth());
                Step::Show(self.show(state))
            }
            Action::Hours(hours) => {
                // A stale weekday button pressed elsewhere moves the user into the weekday menu
                if session.state() != MenuState::TeamSchedule {
                    session.push(MenuState::TeamSchedule);
                }
                Step::Show(Response::with_menu(hours, menu::submenu(menu::WEEKDAYS)))
            }
            Action::Vote(vote) => Step::Vote(vote),
            Action::Tally => Step::Tally,
        }
    }

    /// Screen for a menu state
    pub fn show(&self, state: MenuState) -> Response {
        let screen = screen(state);
        match screen.options {
            Options::Main => Response::with_menu(screen.prompt, menu::root_menu()),
            Options::Labels(labels) => Response::with_menu(screen.prompt, menu::submenu(labels)),
            Options::Teams => {
                Response::with_buttons(screen.prompt, self.roster.team_names_except(None))
            }
            Options::FreeText => Response::text(screen.prompt),
        }
    }

    fn free_text(&self, session: &mut Session, text: &str) -> Step {
        if session.depth() > 1 && session.state() == MenuState::Weather {
            return Step::Weather(text.trim().to_string());
        }

        debug!("Unrecognized input from {}, back to root", session.user_id());
        session.reset();
        Step::Show(Response::with_menu(NOT_UNDERSTOOD, menu::root_menu()))
    }
}
