//! The menu tree as data: which label does what, and what each menu shows.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::managers::voting_manager::Vote;
use crate::state::MenuState;
use crate::transport::Menu;

pub const RETURN_TO_MAIN: &str = "В главное меню";
pub const TOTAL_RESULTS: &str = "total_results";

pub const SCHEDULE: &str = "Расписание";
pub const COMPETITIONS: &str = "Соревнования";
pub const VOTING: &str = "Голосование";
pub const WEATHER: &str = "Прогноз погоды";
pub const KARAVELLA: &str = "Каравелла";
pub const CHAMPIONSHIP: &str = "Чемпионат г.Архангельска";
pub const SCHEDULE_AND_RESULTS: &str = "Расписание и результаты";

const BUTTONS_PER_ROW: usize = 2;

/// What a recognized label does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Back to the root menu
    Home,
    /// Push a frame for the menu and show it
    Enter(MenuState),
    /// Answer with practice hours and stay in the weekday menu
    Hours(&'static str),
    Vote(Vote),
    Tally,
}

const TRANSITIONS: &[(&str, Action)] = &[
    (RETURN_TO_MAIN, Action::Home),
    (SCHEDULE, Action::Enter(MenuState::Schedule)),
    (KARAVELLA, Action::Enter(MenuState::TeamSchedule)),
    ("Среда", Action::Hours("18:00 - 21:00")),
    ("Пятница", Action::Hours("20:00 - 22:00")),
    ("Воскресенье", Action::Hours("19:30 - 21:00")),
    (COMPETITIONS, Action::Enter(MenuState::Competitions)),
    (CHAMPIONSHIP, Action::Enter(MenuState::Championship)),
    (SCHEDULE_AND_RESULTS, Action::Enter(MenuState::ScheduleLookup)),
    (VOTING, Action::Enter(MenuState::Voting)),
    (WEATHER, Action::Enter(MenuState::Weather)),
    ("Буду", Action::Vote(Vote::Attending)),
    ("Не буду", Action::Vote(Vote::NotAttending)),
    (TOTAL_RESULTS, Action::Tally),
];

static BY_LABEL: Lazy<HashMap<&'static str, Action>> =
    Lazy::new(|| TRANSITIONS.iter().copied().collect());

/// Exact-match lookup of an input label
pub fn action_for(label: &str) -> Option<Action> {
    BY_LABEL.get(label).copied()
}

/// Options a menu offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Options {
    /// Root layout
    Main,
    /// Fixed labels followed by a return row
    Labels(&'static [&'static str]),
    /// Inline buttons of every team
    Teams,
    /// Free text expected, keyboard unchanged
    FreeText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub prompt: &'static str,
    pub options: Options,
}

pub const WEEKDAYS: &[&str] = &["Среда", "Пятница", "Воскресенье"];

pub fn screen(state: MenuState) -> Screen {
    let (prompt, options) = match state {
        MenuState::Root => ("Выберете команду", Options::Main),
        MenuState::Schedule => ("Выберете команду", Options::Labels(&[KARAVELLA])),
        MenuState::TeamSchedule => ("Выберете день недели", Options::Labels(WEEKDAYS)),
        MenuState::Competitions => ("Выберете действие", Options::Labels(&[CHAMPIONSHIP])),
        MenuState::Championship => ("Выберете действие", Options::Labels(&[SCHEDULE_AND_RESULTS])),
        MenuState::Voting => (
            "Кто будет сегодня на тренировке?",
            Options::Labels(&["Буду", "Не буду"]),
        ),
        MenuState::ScheduleLookup => ("Выберите первую команду:", Options::Teams),
        MenuState::Weather => (
            "Отправьте боту название города и он скажет, какая там погода",
            Options::FreeText,
        ),
    };
    Screen { prompt, options }
}

pub fn root_menu() -> Menu {
    Menu {
        rows: vec![
            vec![SCHEDULE.to_string(), COMPETITIONS.to_string()],
            vec![VOTING.to_string()],
            vec![WEATHER.to_string()],
        ],
    }
}

pub fn submenu(labels: &[&str]) -> Menu {
    Menu::grid(labels, BUTTONS_PER_ROW, Some(RETURN_TO_MAIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_label_is_recognized() {
        let states = [
            MenuState::Schedule,
            MenuState::TeamSchedule,
            MenuState::Competitions,
            MenuState::Championship,
            MenuState::Voting,
        ];
        for state in states {
            if let Options::Labels(labels) = screen(state).options {
                for label in submenu(labels).labels() {
                    assert!(action_for(label).is_some(), "{} has no action", label);
                }
            }
        }
        for label in root_menu().labels() {
            assert!(matches!(action_for(label), Some(Action::Enter(_))));
        }
    }

    #[test]
    fn test_labels_match_exactly() {
        assert_eq!(action_for("Среда"), Some(Action::Hours("18:00 - 21:00")));
        assert_eq!(action_for("среда"), None);
        assert_eq!(action_for(" Среда"), None);
    }
}
