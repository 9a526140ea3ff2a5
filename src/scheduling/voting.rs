use std::collections::BTreeSet;

use crate::api::types::{EventDetails, EventType};

/// How many slots a participant may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMode {
    /// Exclusive reservation of one slot.
    Booking,
    SingleChoice,
    MultipleChoice,
}

impl VoteMode {
    pub fn for_event(event: &EventDetails) -> Self {
        match (event.event_type, event.multiple_choice) {
            (EventType::Booking, _) => VoteMode::Booking,
            (EventType::Poll, true) => VoteMode::MultipleChoice,
            (EventType::Poll, false) => VoteMode::SingleChoice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    Viewing,
    Editing,
    Submitting,
}

/// What the caller has to do after `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// Nothing changed; no request needed.
    NoChange,
    /// Send these slot ids to the server.
    Send(Vec<i64>),
    /// Submit called outside the editing state.
    Ignored,
}

/// Participant's slot selection on the event detail screen.
#[derive(Debug, Clone)]
pub struct VoteSession {
    mode: VoteMode,
    state: VoteState,
    confirmed: BTreeSet<i64>,
    selected: BTreeSet<i64>,
}

impl VoteSession {
    /// Starts in `Editing` for a first-time voter and in `Viewing` otherwise.
    pub fn new(mode: VoteMode, confirmed: impl IntoIterator<Item = i64>) -> Self {
        let confirmed: BTreeSet<i64> = confirmed.into_iter().collect();
        let state = if confirmed.is_empty() {
            VoteState::Editing
        } else {
            VoteState::Viewing
        };
        Self {
            mode,
            state,
            selected: confirmed.clone(),
            confirmed,
        }
    }

    pub fn mode(&self) -> VoteMode {
        self.mode
    }

    pub fn state(&self) -> VoteState {
        self.state
    }

    pub fn is_selected(&self, slot_id: i64) -> bool {
        self.selected.contains(&slot_id)
    }

    pub fn selected(&self) -> impl Iterator<Item = i64> + '_ {
        self.selected.iter().copied()
    }

    pub fn confirmed(&self) -> impl Iterator<Item = i64> + '_ {
        self.confirmed.iter().copied()
    }

    pub fn begin_editing(&mut self) {
        if self.state == VoteState::Viewing {
            self.state = VoteState::Editing;
        }
    }

    /// Flips a slot according to the mode. Returns false when the toggle was
    /// ignored because the session is not editable.
    pub fn toggle(&mut self, slot_id: i64) -> bool {
        if self.state != VoteState::Editing {
            return false;
        }
        if self.selected.remove(&slot_id) {
            return true;
        }
        match self.mode {
            VoteMode::Booking | VoteMode::SingleChoice => self.selected.clear(),
            VoteMode::MultipleChoice => {}
        }
        self.selected.insert(slot_id);
        true
    }

    pub fn has_changes(&self) -> bool {
        self.selected != self.confirmed
    }

    pub fn submit(&mut self) -> SubmitAction {
        if self.state != VoteState::Editing {
            return SubmitAction::Ignored;
        }
        if !self.has_changes() {
            self.state = VoteState::Viewing;
            return SubmitAction::NoChange;
        }
        self.state = VoteState::Submitting;
        SubmitAction::Send(self.selected.iter().copied().collect())
    }

    pub fn submit_succeeded(&mut self) {
        if self.state == VoteState::Submitting {
            self.confirmed = self.selected.clone();
            self.state = VoteState::Viewing;
        }
    }

    /// Rolls the selection back to what the server last confirmed.
    pub fn submit_failed(&mut self) {
        if self.state == VoteState::Submitting {
            self.selected = self.confirmed.clone();
            self.state = VoteState::Editing;
        }
    }
}
