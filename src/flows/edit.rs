use super::create::{alert_schedule_error, alert_validation_error};
use super::{AppContext, FlowError};
use crate::api::types::{EventFullResponse, EventType, UpdateEventRequest};
use crate::host::Route;
use crate::i18n::Message;
use crate::scheduling::slots::DateToggle;
use crate::scheduling::{
    build_update, has_changes, DateKey, DatePicker, EventDraft, MonthGrid, ScheduleError, SelectionPolicy,
    SlotCollection, SlotKey, SlotTime, TemplateTarget, TimeTemplate,
};
use crate::utils::feedback::Feedback;
use crate::utils::logging::log_flow_event;
use crate::utils::validation::validate_event_form;

const FLOW: &str = "edit";

/// State of the creator's edit screen for one event.
pub struct EditEventFlow {
    ctx: AppContext,
    feedback: Feedback,
    original: EventFullResponse,
    pub draft: EventDraft,
    slots: SlotCollection,
    picker: DatePicker,
    pub template: TimeTemplate,
}

impl EditEventFlow {
    /// Fetches the event and opens it for editing.
    pub async fn load(ctx: AppContext, event_id: i64) -> Result<Self, FlowError> {
        match ctx.api.event(event_id).await {
            Ok(snapshot) => Self::from_snapshot(ctx, snapshot),
            Err(e) => {
                ctx.feedback().error(Message::ErrorLoadingEvent).await?;
                Err(e.into())
            }
        }
    }

    /// Only the creator may edit; everyone else gets [`FlowError::NotCreator`].
    pub fn from_snapshot(ctx: AppContext, snapshot: EventFullResponse) -> Result<Self, FlowError> {
        if !snapshot.event.is_creator {
            log_flow_event(FLOW, "rejected", Some("not the creator"));
            return Err(FlowError::NotCreator);
        }

        let slots = SlotCollection::from_server_slots(&snapshot.slots, ctx.timezone);
        let shown_month = slots
            .dates()
            .next()
            .map(DateKey::date)
            .unwrap_or_else(|| ctx.clock.today(ctx.timezone));
        let feedback = ctx.feedback();
        feedback.main_button(Message::SaveChangesButton);
        feedback.secondary_button(Message::CancelButton);
        log_flow_event(FLOW, "opened", Some(&snapshot.event.id.to_string()));

        Ok(Self {
            draft: EventDraft::from_event(&snapshot),
            original: snapshot,
            slots,
            picker: DatePicker::new(shown_month, SelectionPolicy::Edit),
            template: TimeTemplate::default(),
            ctx,
            feedback,
        })
    }

    pub fn event_id(&self) -> i64 {
        self.original.event.id
    }

    pub fn original(&self) -> &EventFullResponse {
        &self.original
    }

    pub fn slots(&self) -> &SlotCollection {
        &self.slots
    }

    pub fn calendar(&self) -> MonthGrid {
        self.picker.grid(self.today(), self.slots.dates())
    }

    pub fn previous_month(&mut self) {
        self.picker.cursor.previous_month();
    }

    pub fn next_month(&mut self) {
        self.picker.cursor.next_month();
    }

    /// Taps a day. Dropping a day whose slots already have votes asks first.
    /// Returns whether the selection changed.
    pub async fn toggle_date(&mut self, date: DateKey) -> Result<bool, FlowError> {
        let selected = self.slots.contains_date(date);
        if !self.picker.can_select(date, self.today(), selected) {
            return Ok(false);
        }

        if selected {
            let voted = self
                .slots
                .slots(date)
                .iter()
                .any(|slot| self.votes_on(slot.server_id) > 0);
            let message = self.removal_message(Message::ConfirmRemoveBookedDate, Message::ConfirmRemoveVotedDate);
            if voted && !self.feedback.confirm(message).await? {
                return Ok(false);
            }
        }

        match self.slots.select_date(date, self.local_now()) {
            DateToggle::Added(_) => log_flow_event(FLOW, "date_added", Some(&date.to_string())),
            DateToggle::Removed(removed) => {
                log_flow_event(FLOW, "date_removed", Some(&format!("{} ({} slots)", date, removed.len())))
            }
        }
        Ok(true)
    }

    pub async fn add_slot(&mut self, date: DateKey) -> Result<SlotKey, FlowError> {
        let now = self.local_now();
        match self.slots.add_slot(date, now) {
            Ok(key) => Ok(key),
            Err(e) => self.schedule_error(e).await,
        }
    }

    /// Removes one slot, asking first when people already voted for it.
    pub async fn remove_slot(&mut self, date: DateKey, key: SlotKey) -> Result<bool, FlowError> {
        let server_id = self
            .slots
            .slots(date)
            .iter()
            .find(|slot| slot.id == key)
            .ok_or(ScheduleError::UnknownSlot(key))?
            .server_id;

        if self.votes_on(server_id) > 0 {
            let message = self.removal_message(Message::ConfirmRemoveBookedSlot, Message::ConfirmRemoveVotedSlot);
            if !self.feedback.confirm(message).await? {
                return Ok(false);
            }
        }

        self.slots.remove_slot(date, key)?;
        Ok(true)
    }

    pub async fn update_slot_time(&mut self, date: DateKey, key: SlotKey, time: SlotTime) -> Result<SlotTime, FlowError> {
        let now = self.local_now();
        match self.slots.update_slot_time(date, key, time, now) {
            Ok(stored) => Ok(stored),
            Err(e) => self.schedule_error(e).await,
        }
    }

    /// Rebuilds the targeted dates from `self.template`. Slots that already
    /// have votes stay; every other slot on those dates is replaced.
    pub async fn apply_template(&mut self, target: TemplateTarget) -> Result<usize, FlowError> {
        let template = self.template;
        let original = &self.original;
        let applied = self
            .slots
            .replace_with_template(&template, target, |slot| votes_on(original, slot.server_id) > 0);
        match applied {
            Ok(added) => Ok(added),
            Err(e) => self.schedule_error(e).await,
        }
    }

    pub async fn remove_all(&mut self) -> Result<bool, FlowError> {
        if self.slots.is_empty() {
            return Ok(false);
        }
        if !self.feedback.confirm(Message::ConfirmRemoveAllSlots).await? {
            return Ok(false);
        }
        self.slots.clear();
        Ok(true)
    }

    pub fn has_changes(&self) -> bool {
        has_changes(&self.original, &self.draft, &self.slots, self.ctx.timezone)
    }

    pub fn build_request(&self) -> Result<UpdateEventRequest, FlowError> {
        Ok(build_update(&self.original, &self.draft, &self.slots, self.ctx.timezone)?)
    }

    /// Validates and saves. Without changes no request is made.
    pub async fn save(&mut self) -> Result<Route, FlowError> {
        let route = Route::EventDetail(self.event_id());
        if let Err(e) = validate_event_form(
            &self.draft.title,
            &self.draft.description,
            &self.draft.location,
            self.slots.total_slots(),
        ) {
            alert_validation_error(&self.feedback, FLOW, e).await?;
            return Err(e.into());
        }

        if !self.has_changes() {
            log_flow_event(FLOW, "unchanged", Some(&self.event_id().to_string()));
            return Ok(route);
        }

        let request = match build_update(&self.original, &self.draft, &self.slots, self.ctx.timezone) {
            Ok(request) => request,
            Err(e) => return self.schedule_error(e).await,
        };
        self.feedback.hide_secondary_button();
        self.feedback.main_button_loading(Message::SaveChangesButton);
        log_flow_event(
            FLOW,
            "submit",
            Some(&format!(
                "{} slots, {} deleted",
                request.slots.len(),
                request.deleted_slot_ids.len()
            )),
        );

        match self.ctx.api.update_event(self.event_id(), &request).await {
            Ok(()) => {
                log_flow_event(FLOW, "saved", Some(&self.event_id().to_string()));
                Ok(route)
            }
            Err(e) => {
                self.feedback.main_button(Message::SaveChangesButton);
                self.feedback.secondary_button(Message::CancelButton);
                self.feedback.error(Message::ErrorUpdatingEvent).await?;
                Err(e.into())
            }
        }
    }

    pub fn cancel(&self) -> Route {
        Route::EventDetail(self.event_id())
    }

    fn votes_on(&self, server_id: Option<i64>) -> u32 {
        votes_on(&self.original, server_id)
    }

    fn removal_message(&self, booking: Message, poll: Message) -> Message {
        match self.original.event.event_type {
            EventType::Booking => booking,
            EventType::Poll => poll,
        }
    }

    fn today(&self) -> chrono::NaiveDate {
        self.ctx.clock.today(self.ctx.timezone)
    }

    fn local_now(&self) -> chrono::NaiveDateTime {
        self.ctx.clock.local_now(self.ctx.timezone)
    }

    async fn schedule_error<T>(&self, error: ScheduleError) -> Result<T, FlowError> {
        alert_schedule_error(&self.feedback, FLOW, &error).await?;
        Err(error.into())
    }
}

fn votes_on(original: &EventFullResponse, server_id: Option<i64>) -> u32 {
    server_id
        .and_then(|id| original.slot(id))
        .map_or(0, |slot| slot.vote_count)
}
