use super::{AppContext, FlowError};
use crate::api::types::{ActiveEvent, ArchivedEvent, EventBase, EventType};
use crate::host::Route;
use crate::i18n::{Language, Message};
use crate::share::{make_event_share_link, make_telegram_share_url, share_text};
use crate::utils::feedback::Feedback;
use crate::utils::logging::log_flow_event;

/// Split of an event list by who created the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventsTab {
    #[default]
    Mine,
    Others,
}

impl EventsTab {
    pub fn title(self, language: Language) -> &'static str {
        match self {
            EventsTab::Mine => language.text(Message::MyEventsTab),
            EventsTab::Others => language.text(Message::OtherEventsTab),
        }
    }

    fn includes(self, event: &EventBase) -> bool {
        match self {
            EventsTab::Mine => event.is_creator,
            EventsTab::Others => !event.is_creator,
        }
    }
}

/// One line of the home or archive list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub event_type: EventType,
    /// Only the creator sees how many people joined.
    pub participant_count: Option<u32>,
    pub is_finalized: bool,
    pub is_expired: bool,
}

impl EventRow {
    fn from_base(event: &EventBase) -> Self {
        Self {
            id: event.id,
            public_id: event.public_id.clone(),
            title: event.title.clone(),
            event_type: event.event_type,
            participant_count: event.is_creator.then_some(event.participant_count),
            is_finalized: event.final_slot_id.is_some(),
            is_expired: false,
        }
    }
}

/// Home screen: the user's active events.
pub struct HomeFlow {
    ctx: AppContext,
    events: Vec<ActiveEvent>,
    pub tab: EventsTab,
}

impl HomeFlow {
    pub async fn load(ctx: AppContext) -> Result<Self, FlowError> {
        match ctx.api.active_events().await {
            Ok(events) => Ok(Self::from_events(ctx, events)),
            Err(e) => {
                show_list_error(&ctx.feedback()).await?;
                Err(e.into())
            }
        }
    }

    pub fn from_events(ctx: AppContext, events: Vec<ActiveEvent>) -> Self {
        setup_buttons(&ctx.feedback());
        log_flow_event("home", "opened", Some(&format!("{} events", events.len())));
        Self {
            ctx,
            events,
            tab: EventsTab::default(),
        }
    }

    /// Rows of the current tab, in the order the backend sent them.
    pub fn rows(&self) -> Vec<EventRow> {
        self.events
            .iter()
            .filter(|event| self.tab.includes(event))
            .map(EventRow::from_base)
            .collect()
    }

    /// The main button always starts a new event.
    pub fn press_main_button(&self) -> Route {
        Route::Create
    }

    pub fn open_event(&self, event_id: i64) -> Option<Route> {
        self.events
            .iter()
            .any(|event| event.id == event_id)
            .then_some(Route::EventDetail(event_id))
    }

    pub fn open_archive(&self) -> Route {
        Route::Archive
    }

    /// Opens Telegram's share picker for one of the listed events.
    pub fn share(&self, event_id: i64) -> Option<String> {
        let event = self.events.iter().find(|event| event.id == event_id)?;
        let links = &self.ctx.links;
        let link = make_event_share_link(&links.bot_username, links.mini_app_name.as_deref(), &event.public_id);
        let text = share_text(self.ctx.language, event.event_type, Some(&event.title));
        let url = make_telegram_share_url(&link, Some(&text));
        self.ctx.host.open_telegram_link(&url);
        log_flow_event("home", "share", Some(&event.public_id));
        Some(url)
    }
}

/// Archive screen: finished, expired and cancelled events.
pub struct ArchiveFlow {
    events: Vec<ArchivedEvent>,
    pub tab: EventsTab,
}

impl ArchiveFlow {
    pub async fn load(ctx: AppContext) -> Result<Self, FlowError> {
        match ctx.api.archived_events().await {
            Ok(events) => Ok(Self::from_events(&ctx, events)),
            Err(e) => {
                show_list_error(&ctx.feedback()).await?;
                Err(e.into())
            }
        }
    }

    pub fn from_events(ctx: &AppContext, events: Vec<ArchivedEvent>) -> Self {
        setup_buttons(&ctx.feedback());
        log_flow_event("archive", "opened", Some(&format!("{} events", events.len())));
        Self {
            events,
            tab: EventsTab::default(),
        }
    }

    pub fn rows(&self) -> Vec<EventRow> {
        self.events
            .iter()
            .filter(|event| self.tab.includes(&event.base))
            .map(|event| EventRow {
                is_expired: event.is_expired,
                ..EventRow::from_base(&event.base)
            })
            .collect()
    }

    pub fn press_main_button(&self) -> Route {
        Route::Create
    }

    pub fn back(&self) -> Route {
        Route::Home
    }
}

fn setup_buttons(feedback: &Feedback) {
    feedback.main_button(Message::CreateEventButton);
    feedback.hide_secondary_button();
}

async fn show_list_error(feedback: &Feedback) -> Result<(), FlowError> {
    feedback.error(Message::ErrorLoadingEvents).await?;
    Ok(())
}
