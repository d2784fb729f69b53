use crate::models::{Team, UserId};

/// Menu a user is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuState {
    Root,
    Schedule,
    /// Weekday picker of a team's practice schedule
    TeamSchedule,
    Competitions,
    Championship,
    Voting,
    /// Two-step team selection for a match lookup
    ScheduleLookup,
    /// Waiting for a city name
    Weather,
}

/// Transient selections of the two-step team lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots {
    pub first: Option<Team>,
    pub second: Option<Team>,
}

impl Slots {
    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub state: MenuState,
    pub slots: Slots,
}

impl Frame {
    pub fn new(state: MenuState) -> Self {
        Self {
            state,
            slots: Slots::default(),
        }
    }
}

/// Ephemeral per-user navigation state. The stack is never empty.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    stack: Vec<Frame>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            stack: vec![Frame::new(MenuState::Root)],
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Truncate to a single root frame
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.stack[0] = Frame::new(MenuState::Root);
    }

    pub fn push(&mut self, state: MenuState) {
        self.stack.push(Frame::new(state));
    }

    pub fn top(&self) -> &Frame {
        // Non-empty: created with a root frame, only ever truncated to one
        &self.stack[self.stack.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn state(&self) -> MenuState {
        self.top().state
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }
}
