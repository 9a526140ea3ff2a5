use std::collections::BTreeSet;

use super::{AppContext, FlowError};
use crate::api::types::{CreateEventRequest, DateSlots, EventType};
use crate::host::Route;
use crate::i18n::Message;
use crate::scheduling::slots::DateToggle;
use crate::scheduling::{
    DateKey, DatePicker, MonthGrid, ScheduleError, SelectionPolicy, SlotCollection, SlotKey, SlotTime,
    TemplateTarget, TimeTemplate,
};
use crate::utils::feedback::Feedback;
use crate::utils::logging::{log_flow_event, log_validation_error};
use crate::utils::validation::{non_empty, validate_event_form, validate_multiple_choice, ValidationError};

const FLOW: &str = "create";

/// State of the "new event" screen.
pub struct CreateEventFlow {
    ctx: AppContext,
    feedback: Feedback,
    pub title: String,
    pub description: String,
    pub location: String,
    event_type: EventType,
    multiple_choice: bool,
    slots: SlotCollection,
    picker: DatePicker,
    pub template: TimeTemplate,
}

impl CreateEventFlow {
    pub fn new(ctx: AppContext) -> Self {
        let feedback = ctx.feedback();
        let today = ctx.clock.today(ctx.timezone);
        feedback.main_button(Message::CreateEventButton);
        feedback.hide_secondary_button();
        log_flow_event(FLOW, "opened", None);
        Self {
            ctx,
            feedback,
            title: String::new(),
            description: String::new(),
            location: String::new(),
            event_type: EventType::Poll,
            multiple_choice: false,
            slots: SlotCollection::new(),
            picker: DatePicker::new(today, SelectionPolicy::Create),
            template: TimeTemplate::default(),
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn multiple_choice(&self) -> bool {
        self.multiple_choice
    }

    pub fn slots(&self) -> &SlotCollection {
        &self.slots
    }

    /// Switching the event type always turns multiple choice off.
    pub fn set_event_type(&mut self, event_type: EventType) {
        if self.event_type != event_type {
            self.event_type = event_type;
            self.multiple_choice = false;
        }
    }

    /// Only polls with at least two slots can allow several choices.
    pub async fn set_multiple_choice(&mut self, enabled: bool) -> Result<(), FlowError> {
        if enabled && self.event_type == EventType::Booking {
            return Ok(());
        }
        if let Err(e) = validate_multiple_choice(enabled, self.slots.total_slots()) {
            return self.reject(e).await;
        }
        self.multiple_choice = enabled;
        Ok(())
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

    /// Taps a day. Returns false when the day is not selectable.
    pub fn toggle_date(&mut self, date: DateKey) -> bool {
        let selected = self.slots.contains_date(date);
        if !self.picker.can_select(date, self.today(), selected) {
            return false;
        }
        if let DateToggle::Removed(_) = self.slots.select_date(date, self.local_now()) {
            self.drop_multiple_choice_if_too_few();
        }
        true
    }

    pub async fn add_slot(&mut self, date: DateKey) -> Result<SlotKey, FlowError> {
        let now = self.local_now();
        match self.slots.add_slot(date, now) {
            Ok(key) => Ok(key),
            Err(e) => self.schedule_error(e).await,
        }
    }

    pub fn remove_slot(&mut self, date: DateKey, key: SlotKey) -> Result<(), FlowError> {
        self.slots.remove_slot(date, key)?;
        self.drop_multiple_choice_if_too_few();
        Ok(())
    }

    pub async fn update_slot_time(&mut self, date: DateKey, key: SlotKey, time: SlotTime) -> Result<SlotTime, FlowError> {
        let now = self.local_now();
        match self.slots.update_slot_time(date, key, time, now) {
            Ok(stored) => Ok(stored),
            Err(e) => self.schedule_error(e).await,
        }
    }

    /// Applies `self.template`; returns how many slots were added.
    pub async fn apply_template(&mut self, target: TemplateTarget) -> Result<usize, FlowError> {
        let template = self.template;
        match self.slots.apply_template(&template, target) {
            Ok(added) => Ok(added),
            Err(e) => self.schedule_error(e).await,
        }
    }

    /// Clears every date after the user confirms. Returns whether it did.
    pub async fn remove_all(&mut self) -> Result<bool, FlowError> {
        if self.slots.is_empty() {
            return Ok(false);
        }
        if !self.feedback.confirm(Message::ConfirmRemoveAllSlots).await? {
            return Ok(false);
        }
        self.slots.clear();
        self.multiple_choice = false;
        Ok(true)
    }

    /// Serializes the form: each date is sent as the UTC instant of its local
    /// midnight together with its distinct `HH:MM` times.
    pub fn build_request(&self) -> Result<CreateEventRequest, FlowError> {
        Ok(self.request()?)
    }

    fn request(&self) -> Result<CreateEventRequest, ScheduleError> {
        let tz = self.ctx.timezone;
        let mut dates = Vec::new();
        for (date, slots) in self.slots.iter() {
            let midnight = date.start_of_day(tz)?;
            let times: BTreeSet<SlotTime> = slots.iter().map(|s| s.time).collect();
            dates.push(DateSlots {
                date: midnight.with_timezone(&chrono::Utc),
                time_slots: times.into_iter().collect(),
            });
        }

        Ok(CreateEventRequest {
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            location: non_empty(&self.location),
            dates,
            allow_multiple_choice: self.event_type == EventType::Poll && self.multiple_choice,
            timezone: tz.name().to_string(),
            event_type: self.event_type,
        })
    }

    /// Validates and sends the form. On success the app opens the new event.
    pub async fn submit(&mut self) -> Result<Route, FlowError> {
        if let Err(e) = validate_event_form(&self.title, &self.description, &self.location, self.slots.total_slots()) {
            return self.reject(e).await;
        }
        let request = match self.request() {
            Ok(request) => request,
            Err(e) => return self.schedule_error(e).await,
        };

        self.feedback.main_button_loading(Message::CreateEventButton);
        log_flow_event(FLOW, "submit", Some(&format!("{} dates", request.dates.len())));
        match self.ctx.api.create_event(&request).await {
            Ok(created) => {
                self.feedback.main_button(Message::CreateEventButton);
                log_flow_event(FLOW, "created", Some(&created.event.id.to_string()));
                Ok(Route::EventDetail(created.event.id))
            }
            Err(e) => {
                self.feedback.main_button(Message::CreateEventButton);
                self.feedback.error(Message::ErrorCreatingEvent).await?;
                Err(e.into())
            }
        }
    }

    fn today(&self) -> chrono::NaiveDate {
        self.ctx.clock.today(self.ctx.timezone)
    }

    fn local_now(&self) -> chrono::NaiveDateTime {
        self.ctx.clock.local_now(self.ctx.timezone)
    }

    fn drop_multiple_choice_if_too_few(&mut self) {
        if self.multiple_choice && self.slots.total_slots() < 2 {
            self.multiple_choice = false;
        }
    }

    async fn reject<T>(&self, error: ValidationError) -> Result<T, FlowError> {
        alert_validation_error(&self.feedback, FLOW, error).await?;
        Err(error.into())
    }

    async fn schedule_error<T>(&self, error: ScheduleError) -> Result<T, FlowError> {
        alert_schedule_error(&self.feedback, FLOW, &error).await?;
        Err(error.into())
    }
}

pub(crate) async fn alert_validation_error(
    feedback: &Feedback,
    flow: &str,
    error: ValidationError,
) -> Result<(), FlowError> {
    log_validation_error(flow, error.field(), &error.to_string());
    feedback.warning(error.message()).await?;
    Ok(())
}

/// Surfaces a slot-editing failure to the user.
pub(crate) async fn alert_schedule_error(
    feedback: &Feedback,
    flow: &str,
    error: &ScheduleError,
) -> Result<(), FlowError> {
    log_validation_error(flow, "slots", &error.to_string());
    let message = match error {
        ScheduleError::InvalidTemplateRange { .. } | ScheduleError::ZeroInterval => Message::TemplateInvalidRange,
        ScheduleError::DuplicateTime { .. } => Message::DuplicateTime,
        ScheduleError::SlotTaken(_) => Message::NoFreeTime,
        ScheduleError::NonexistentLocalTime { .. } => Message::NonexistentTime,
        ScheduleError::InvalidTime(_) => Message::InvalidTime,
        ScheduleError::InvalidDate(_) | ScheduleError::DateNotSelected(_) | ScheduleError::UnknownSlot(_) => {
            return Ok(())
        }
    };
    feedback.warning(message).await?;
    Ok(())
}
