use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::managers::Dispatcher;

/// Practice days: reminders are sent and votes cleared on these
pub const PRACTICE_DAYS: [Weekday; 3] = [Weekday::Wed, Weekday::Fri, Weekday::Sun];

const TICK: Duration = Duration::from_secs(30);
/// How late a job may still fire after its scheduled time
const WINDOW_MINUTES: i64 = 5;

pub fn is_practice_day(weekday: Weekday) -> bool {
    PRACTICE_DAYS.contains(&weekday)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    ClearVotes,
    Reminder,
}

/// Fires each job at most once per practice day
#[derive(Debug)]
pub struct Scheduler {
    reminder_at: NaiveTime,
    vote_reset_at: NaiveTime,
    last_reminder: Option<NaiveDate>,
    last_reset: Option<NaiveDate>,
}

impl Scheduler {
    pub fn new(reminder_at: NaiveTime, vote_reset_at: NaiveTime) -> Self {
        Self {
            reminder_at,
            vote_reset_at,
            last_reminder: None,
            last_reset: None,
        }
    }

    /// Jobs due at `now`, marking them fired
    pub fn due(&mut self, now: NaiveDateTime) -> Vec<Job> {
        let mut jobs = Vec::new();
        if !is_practice_day(now.weekday()) {
            return jobs;
        }

        let today = now.date();
        if in_window(now.time(), self.vote_reset_at) && self.last_reset != Some(today) {
            self.last_reset = Some(today);
            jobs.push(Job::ClearVotes);
        }
        if in_window(now.time(), self.reminder_at) && self.last_reminder != Some(today) {
            self.last_reminder = Some(today);
            jobs.push(Job::Reminder);
        }
        jobs
    }

    /// Tick forever, running due jobs against the dispatcher
    pub async fn run(mut self, dispatcher: Arc<Dispatcher>) {
        info!(
            "Scheduler started: reminder at {}, vote reset at {} on {:?}",
            self.reminder_at, self.vote_reset_at, PRACTICE_DAYS
        );
        let mut interval = tokio::time::interval(TICK);
        loop {
            interval.tick().await;
            let now = Local::now().naive_local();
            for job in self.due(now) {
                match job {
                    Job::ClearVotes => {
                        dispatcher.clear_votes_if_scheduled_day(now.weekday());
                    }
                    Job::Reminder => dispatcher.broadcast_reminder().await,
                }
            }
        }
    }
}

fn in_window(now: NaiveTime, at: NaiveTime) -> bool {
    let since = now.signed_duration_since(at);
    since >= chrono::Duration::zero() && since < chrono::Duration::minutes(WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        // 2024-05-01 is a Wednesday
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_practice_days() {
        assert!(is_practice_day(Weekday::Wed));
        assert!(is_practice_day(Weekday::Fri));
        assert!(is_practice_day(Weekday::Sun));
        assert!(!is_practice_day(Weekday::Mon));
        assert!(!is_practice_day(Weekday::Sat));
    }

    #[test]
    fn test_reminder_fires_once_per_day() {
        let mut scheduler = scheduler();
        assert_eq!(scheduler.due(at(1, 9, 59)), Vec::<Job>::new());
        assert_eq!(scheduler.due(at(1, 10, 0)), vec![Job::Reminder]);
        assert_eq!(scheduler.due(at(1, 10, 1)), Vec::<Job>::new());
        assert_eq!(scheduler.due(at(1, 10, 5)), Vec::<Job>::new());
        // Friday
        assert_eq!(scheduler.due(at(3, 10, 2)), vec![Job::Reminder]);
    }

    #[test]
    fn test_votes_cleared_at_start_of_practice_day() {
        let mut scheduler = scheduler();
        assert_eq!(scheduler.due(at(1, 0, 0)), vec![Job::ClearVotes]);
        assert_eq!(scheduler.due(at(1, 0, 3)), Vec::<Job>::new());
    }

    #[test]
    fn test_nothing_on_other_days() {
        let mut scheduler = scheduler();
        // Thursday and Saturday
        assert_eq!(scheduler.due(at(2, 10, 0)), Vec::<Job>::new());
        assert_eq!(scheduler.due(at(4, 0, 0)), Vec::<Job>::new());
    }

    #[test]
    fn test_late_start_skips_missed_jobs() {
        let mut scheduler = scheduler();
        assert_eq!(scheduler.due(at(1, 15, 0)), Vec::<Job>::new());
    }
}
