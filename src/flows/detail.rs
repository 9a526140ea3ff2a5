use chrono::NaiveDate;
use chrono_tz::Tz;
use uuid::Uuid;

use super::{event_timezone, AppContext, FlowError};
use crate::api::types::{EventFullResponse, EventSlot, EventType};
use crate::api::ApiError;
use crate::export::calendar_page_url;
use crate::host::Route;
use crate::i18n::Message;
use crate::scheduling::{reduce, EventAction, SubmitAction, VoteMode, VoteSession, VoteState};
use crate::share::{make_event_share_link, make_telegram_share_url, share_text};
use crate::utils::datetime::{format_slot_date, format_slot_time};
use crate::utils::feedback::Feedback;
use crate::utils::logging::log_flow_event;

const FLOW: &str = "detail";

/// Result of the creator pressing "finalize".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    Finalized(i64),
    /// Neither the event nor the form has a location yet.
    NeedsLocation,
    NoCandidate,
}

/// One row of the slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRow {
    pub slot_id: i64,
    pub time: String,
    pub vote_count: u32,
    pub is_selected: bool,
    pub is_final: bool,
}

/// Slots sharing a calendar day in the display timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup {
    pub date: NaiveDate,
    pub heading: String,
    pub rows: Vec<SlotRow>,
}

/// State of the event screen, for the creator and for participants.
pub struct EventDetailFlow {
    ctx: AppContext,
    feedback: Feedback,
    snapshot: EventFullResponse,
    event_tz: Tz,
    votes: VoteSession,
    finalize_candidate: Option<i64>,
    use_event_timezone: bool,
    /// Location typed in the finalize form when the event has none.
    pub temp_location: String,
}

impl EventDetailFlow {
    pub async fn load(ctx: AppContext, event_id: i64) -> Result<Self, FlowError> {
        let fetched = ctx.api.event(event_id).await;
        Self::from_fetch(ctx, fetched).await
    }

    /// Opens an event reached through an invitation link.
    pub async fn load_public(ctx: AppContext, public_id: Uuid) -> Result<Self, FlowError> {
        let fetched = ctx.api.public_event(&public_id.to_string()).await;
        Self::from_fetch(ctx, fetched).await
    }

    pub fn from_snapshot(ctx: AppContext, snapshot: EventFullResponse) -> Result<Self, FlowError> {
        let event_tz = event_timezone(&snapshot.event.timezone)?;
        let votes = VoteSession::new(
            VoteMode::for_event(&snapshot.event),
            snapshot.current_user_votes.iter().map(|v| v.slot_id),
        );
        log_flow_event(FLOW, "opened", Some(&snapshot.event.id.to_string()));

        let flow = Self {
            feedback: ctx.feedback(),
            ctx,
            snapshot,
            event_tz,
            votes,
            finalize_candidate: None,
            use_event_timezone: false,
            temp_location: String::new(),
        };
        flow.refresh_buttons();
        Ok(flow)
    }

    async fn from_fetch(ctx: AppContext, fetched: Result<EventFullResponse, ApiError>) -> Result<Self, FlowError> {
        match fetched {
            Ok(snapshot) => Self::from_snapshot(ctx, snapshot),
            Err(e) => {
                ctx.feedback().error(Message::ErrorLoadingEvent).await?;
                Err(e.into())
            }
        }
    }

    pub fn snapshot(&self) -> &EventFullResponse {
        &self.snapshot
    }

    pub fn is_creator(&self) -> bool {
        self.snapshot.event.is_creator
    }

    pub fn vote_session(&self) -> &VoteSession {
        &self.votes
    }

    pub fn finalize_candidate(&self) -> Option<i64> {
        self.finalize_candidate
    }

    /// True when the event's zone differs from the user's, so the screen
    /// offers a switch between them.
    pub fn timezones_differ(&self) -> bool {
        self.event_tz != self.ctx.timezone
    }

    pub fn set_use_event_timezone(&mut self, enabled: bool) {
        self.use_event_timezone = enabled;
    }

    pub fn display_timezone(&self) -> Tz {
        if self.use_event_timezone {
            self.event_tz
        } else {
            self.ctx.timezone
        }
    }

    /// Slots the current user gets to see, earliest first.
    ///
    /// A finalized event shows only its final slot. The creator sees every
    /// slot; participants see future slots plus past ones they voted for.
    /// In a booking a participant never sees slots other people hold, and
    /// outside of editing only their own booking.
    pub fn visible_slots(&self) -> Vec<&EventSlot> {
        let mut visible: Vec<&EventSlot> = if let Some(final_slot) = self.snapshot.final_slot() {
            vec![final_slot]
        } else if self.is_creator() {
            self.snapshot.slots.iter().collect()
        } else if self.votes.mode() == VoteMode::Booking && self.votes.state() == VoteState::Viewing {
            self.snapshot
                .slots
                .iter()
                .filter(|slot| self.holds_booking(slot.id))
                .collect()
        } else {
            let now = self.ctx.clock.now();
            self.snapshot
                .slots
                .iter()
                .filter(|slot| slot.slot_start > now || slot.current_user_voted)
                .filter(|slot| !self.is_booked_by_others(slot))
                .collect()
        };
        visible.sort_by_key(|slot| slot.slot_start);
        visible
    }

    /// Visible slots grouped by day in [`Self::display_timezone`].
    pub fn grouped_slots(&self) -> Vec<SlotGroup> {
        let tz = self.display_timezone();
        let language = self.ctx.language;
        let final_slot_id = self.snapshot.event.final_slot_id;
        let mut groups: Vec<SlotGroup> = Vec::new();

        for slot in self.visible_slots() {
            let date = slot.slot_start.with_timezone(&tz).date_naive();
            let row = SlotRow {
                slot_id: slot.id,
                time: format_slot_time(slot.slot_start, tz),
                vote_count: slot.vote_count,
                is_selected: self.is_slot_selected(slot.id),
                is_final: final_slot_id == Some(slot.id),
            };
            match groups.last_mut() {
                Some(group) if group.date == date => group.rows.push(row),
                _ => groups.push(SlotGroup {
                    date,
                    heading: format_slot_date(slot.slot_start, tz, language),
                    rows: vec![row],
                }),
            }
        }
        groups
    }

    pub fn is_slot_selected(&self, slot_id: i64) -> bool {
        if self.is_creator() {
            self.finalize_candidate == Some(slot_id)
        } else {
            self.votes.is_selected(slot_id)
        }
    }

    /// Taps a slot: picks the finalize candidate for the creator of a poll,
    /// flips the vote for a participant. Returns false when nothing changed,
    /// which includes a participant tapping a slot someone else booked.
    pub fn toggle_slot(&mut self, slot_id: i64) -> bool {
        let Some(slot) = self.snapshot.slot(slot_id) else {
            return false;
        };
        if self.snapshot.event.is_finalized() {
            return false;
        }
        if !self.is_creator() && self.is_booked_by_others(slot) {
            log_flow_event(FLOW, "slot_taken", Some(&slot_id.to_string()));
            return false;
        }

        let changed = if self.is_creator() {
            if self.snapshot.event.event_type != EventType::Poll {
                return false;
            }
            self.finalize_candidate = match self.finalize_candidate {
                Some(current) if current == slot_id => None,
                _ => Some(slot_id),
            };
            true
        } else {
            self.votes.toggle(slot_id)
        };

        if changed {
            self.refresh_buttons();
        }
        changed
    }

    /// Handles the main button. Returns a route when the screen should be left.
    pub async fn press_main_button(&mut self) -> Result<Option<Route>, FlowError> {
        if self.is_creator() {
            if self.finalize_candidate.is_some() {
                self.finalize().await?;
                return Ok(None);
            }
            return self.delete().await;
        }

        match self.votes.state() {
            VoteState::Viewing => {
                self.votes.begin_editing();
                self.refresh_buttons();
            }
            VoteState::Editing => self.submit_votes().await?,
            VoteState::Submitting => {}
        }
        Ok(None)
    }

    /// Handles the creator's secondary button.
    pub async fn press_secondary_button(&mut self) -> Result<Option<Route>, FlowError> {
        if self.snapshot.event.is_finalized() {
            self.unfinalize().await?;
            return Ok(None);
        }
        self.edit().map(Some)
    }

    /// Sends the participant's selection and applies it locally once the
    /// server accepts it. On failure the selection rolls back.
    pub async fn submit_votes(&mut self) -> Result<(), FlowError> {
        let slot_ids = match self.votes.submit() {
            SubmitAction::Send(slot_ids) => slot_ids,
            SubmitAction::NoChange => {
                log_flow_event(FLOW, "votes_unchanged", None);
                self.refresh_buttons();
                return Ok(());
            }
            SubmitAction::Ignored => return Ok(()),
        };

        self.refresh_buttons();
        log_flow_event(FLOW, "submit_votes", Some(&format!("{:?}", slot_ids)));
        match self.ctx.api.submit_votes(self.event_id(), &slot_ids).await {
            Ok(()) => {
                self.votes.submit_succeeded();
                self.snapshot = reduce(
                    &self.snapshot,
                    &EventAction::VotesSubmitted {
                        slot_ids,
                        at: self.ctx.clock.now(),
                    },
                );
                self.refresh_buttons();
                self.feedback.success(Message::SelectionConfirmed).await?;
                Ok(())
            }
            Err(e) => {
                self.votes.submit_failed();
                self.refresh_buttons();
                self.feedback.error(Message::ErrorSubmittingVotes).await?;
                Err(e.into())
            }
        }
    }

    /// Fixes the chosen slot as the outcome of the poll.
    pub async fn finalize(&mut self) -> Result<FinalizeOutcome, FlowError> {
        self.require_creator()?;
        let Some(slot_id) = self.finalize_candidate else {
            return Ok(FinalizeOutcome::NoCandidate);
        };

        let has_location = self
            .snapshot
            .event
            .location
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty());
        let temp_location = self.temp_location.trim().to_string();
        if !has_location && temp_location.is_empty() {
            self.feedback.warning(Message::LocationRequired).await?;
            return Ok(FinalizeOutcome::NeedsLocation);
        }
        let location = (!temp_location.is_empty()).then_some(temp_location);

        self.feedback.main_button_loading(Message::FinalizeButton);
        log_flow_event(FLOW, "finalize", Some(&slot_id.to_string()));
        match self
            .ctx
            .api
            .finalize(self.event_id(), slot_id, location.as_deref())
            .await
        {
            Ok(()) => {
                self.snapshot = reduce(&self.snapshot, &EventAction::Finalized { slot_id, location });
                self.finalize_candidate = None;
                self.temp_location.clear();
                self.refresh_buttons();
                self.feedback.success(Message::EventFinalized).await?;
                Ok(FinalizeOutcome::Finalized(slot_id))
            }
            Err(e) => {
                self.refresh_buttons();
                self.feedback.error(Message::ErrorFinalizingEvent).await?;
                Err(e.into())
            }
        }
    }

    /// Reopens a finalized event after confirmation. Returns whether it did.
    pub async fn unfinalize(&mut self) -> Result<bool, FlowError> {
        self.require_creator()?;
        if !self.snapshot.event.is_finalized() {
            return Err(FlowError::NotFinalized);
        }
        if !self.feedback.confirm(Message::ConfirmUnfinalize).await? {
            return Ok(false);
        }

        log_flow_event(FLOW, "unfinalize", Some(&self.event_id().to_string()));
        match self.ctx.api.unfinalize_event(self.event_id()).await {
            Ok(()) => {
                self.snapshot = reduce(&self.snapshot, &EventAction::Unfinalized);
                self.refresh_buttons();
                self.feedback.success(Message::EventUnfinalized).await?;
                Ok(true)
            }
            Err(e) => {
                self.feedback.error(Message::ErrorUnfinalizingEvent).await?;
                Err(e.into())
            }
        }
    }

    /// Deletes the event after confirmation and leaves for the home screen.
    pub async fn delete(&mut self) -> Result<Option<Route>, FlowError> {
        self.require_creator()?;
        if !self.feedback.confirm(Message::ConfirmDeleteEvent).await? {
            return Ok(None);
        }

        log_flow_event(FLOW, "delete", Some(&self.event_id().to_string()));
        match self.ctx.api.delete_event(self.event_id()).await {
            Ok(()) => {
                self.feedback.success(Message::EventDeleted).await?;
                Ok(Some(Route::Home))
            }
            Err(e) => {
                self.feedback.error(Message::ErrorDeletingEvent).await?;
                Err(e.into())
            }
        }
    }

    pub fn edit(&self) -> Result<Route, FlowError> {
        self.require_creator()?;
        Ok(Route::EventEdit(self.event_id()))
    }

    /// Opens Telegram's share picker with an invitation; returns the URL.
    pub fn share(&self) -> String {
        let event = &self.snapshot.event;
        let links = &self.ctx.links;
        let link = make_event_share_link(&links.bot_username, links.mini_app_name.as_deref(), &event.public_id);
        let text = share_text(self.ctx.language, event.event_type, Some(&event.title));
        let url = make_telegram_share_url(&link, Some(&text));
        self.ctx.host.open_telegram_link(&url);
        log_flow_event(FLOW, "share", Some(&event.public_id));
        url
    }

    /// Opens the calendar export page for the final slot; returns the URL.
    pub fn add_to_calendar(&self) -> Result<String, FlowError> {
        let slot = self.snapshot.final_slot().ok_or(FlowError::NotFinalized)?;
        let url = calendar_page_url(
            &self.ctx.links.calendar_page_url,
            &self.snapshot.event,
            slot,
            self.ctx.language,
        );
        self.ctx.host.open_link(&url);
        Ok(url)
    }

    /// Clickable form of the event location, if it looks like a link.
    pub fn location_link(&self) -> Option<String> {
        self.snapshot.event.location.as_deref().and_then(location_href)
    }

    fn event_id(&self) -> i64 {
        self.snapshot.event.id
    }

    /// Whether the last confirmed selection of this user holds the slot.
    fn holds_booking(&self, slot_id: i64) -> bool {
        self.votes.confirmed().any(|id| id == slot_id)
    }

    /// A booking slot reserved by somebody other than the current user.
    fn is_booked_by_others(&self, slot: &EventSlot) -> bool {
        self.votes.mode() == VoteMode::Booking
            && slot.vote_count > 0
            && !slot.current_user_voted
            && !self.holds_booking(slot.id)
    }

    fn require_creator(&self) -> Result<(), FlowError> {
        if self.is_creator() {
            Ok(())
        } else {
            Err(FlowError::NotCreator)
        }
    }

    fn refresh_buttons(&self) {
        let finalized = self.snapshot.event.is_finalized();
        if self.is_creator() {
            match self.finalize_candidate {
                Some(_) if !finalized => self.feedback.main_button(Message::FinalizeButton),
                _ => self.feedback.main_button(Message::CancelEventButton),
            }
            if finalized {
                self.feedback.secondary_button(Message::UnfinalizeButton);
            } else {
                self.feedback.secondary_button(Message::EditEventButton);
            }
            return;
        }

        self.feedback.hide_secondary_button();
        if finalized {
            self.feedback.hide_main_button();
            return;
        }
        match self.votes.state() {
            VoteState::Viewing => self.feedback.main_button(Message::EditSelectionButton),
            VoteState::Editing if self.votes.selected().next().is_some() => {
                self.feedback.main_button(Message::ConfirmChoiceButton)
            }
            VoteState::Editing => self.feedback.main_button_disabled(Message::ConfirmChoiceButton),
            VoteState::Submitting => self.feedback.main_button_loading(Message::ConfirmChoiceButton),
        }
    }
}

/// `http(s)` URLs are kept, bare domains such as `meet.example.com/room`
/// get an `https://` prefix, anything else is plain text.
pub fn location_href(location: &str) -> Option<String> {
    let location = location.trim();
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(location.to_string());
    }
    if location.is_empty() || location.chars().any(char::is_whitespace) {
        return None;
    }

    let host = location.split(['/', '?', '#']).next().unwrap_or_default();
    let tld = host.rsplit('.').next().unwrap_or_default();
    let looks_like_domain = host.contains('.')
        && !host.starts_with('.')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic());
    looks_like_domain.then(|| format!("https://{location}"))
}
