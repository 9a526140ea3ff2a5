//! Screen flows. Each flow owns the state of one screen and talks to the
//! backend and the host only through the injected [`AppContext`].

pub mod bootstrap;
pub mod create;
pub mod detail;
pub mod edit;
pub mod home;

pub use bootstrap::bootstrap;
pub use create::CreateEventFlow;
pub use detail::{EventDetailFlow, FinalizeOutcome};
pub use edit::EditEventFlow;
pub use home::{ArchiveFlow, EventRow, EventsTab, HomeFlow};

use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, EventsApi};
use crate::config::LinkSettings;
use crate::host::{HostBridge, HostError, Route};
use crate::i18n::Language;
use crate::scheduling::ScheduleError;
use crate::utils::datetime::{parse_timezone, Clock, SystemClock};
use crate::utils::feedback::Feedback;
use crate::utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Only the event creator can do this")]
    NotCreator,

    #[error("Event has no final slot")]
    NotFinalized,

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),
}

impl FlowError {
    /// Where the app goes when a flow gives up.
    pub fn fallback_route(&self) -> Route {
        match self {
            FlowError::Host(_) => Route::EnvUnsupported,
            _ => Route::Home,
        }
    }
}

/// Collaborators shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn EventsApi>,
    pub host: Arc<dyn HostBridge>,
    pub clock: Arc<dyn Clock>,
    /// The user's own zone; slot wall-clock times are read and written in it.
    pub timezone: Tz,
    pub language: Language,
    pub links: LinkSettings,
}

impl AppContext {
    /// Language comes from the host's launch parameters.
    pub fn new(api: Arc<dyn EventsApi>, host: Arc<dyn HostBridge>, timezone: Tz) -> Self {
        let language = host.launch_params().language();
        Self {
            api,
            host,
            clock: Arc::new(SystemClock),
            timezone,
            language,
            links: LinkSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_links(mut self, links: LinkSettings) -> Self {
        self.links = links;
        self
    }

    pub fn feedback(&self) -> Feedback {
        Feedback::new(self.host.clone(), self.language)
    }
}

/// Resolves an event's IANA zone name.
pub(crate) fn event_timezone(name: &str) -> Result<Tz, FlowError> {
    parse_timezone(name).ok_or_else(|| FlowError::InvalidTimezone(name.to_string()))
}
