#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use timetally::api::types::{
    timestamp, ActiveEvent, ArchivedEvent, CreateEventRequest, CreateEventResponse, CreatedEventRef,
    EventDetails, EventFullResponse, EventSlot, EventType, UpdateEventRequest,
};
use timetally::api::{ApiError, EventsApi};
use timetally::flows::AppContext;
use timetally::host::{LaunchParams, RecordingBridge};
use timetally::utils::datetime::FixedClock;

/// Calls received by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Validate,
    ActiveEvents,
    ArchivedEvents,
    Create(CreateEventRequest),
    Update(i64, UpdateEventRequest),
    Event(i64),
    PublicEvent(String),
    Delete(i64),
    Unfinalize(i64),
    Votes(i64, Vec<i64>),
    Finalize(i64, i64, Option<String>),
}

/// Backend double: serves stored snapshots and records every call.
#[derive(Default)]
pub struct FakeApi {
    events: Mutex<HashMap<i64, EventFullResponse>>,
    active: Mutex<Vec<ActiveEvent>>,
    archived: Mutex<Vec<ArchivedEvent>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<Option<u16>>,
}

impl FakeApi {
    pub fn with_event(event: EventFullResponse) -> Self {
        let api = Self::default();
        api.events.lock().unwrap().insert(event.event.id, event);
        api
    }

    pub fn with_lists(active: Vec<ActiveEvent>, archived: Vec<ArchivedEvent>) -> Self {
        let api = Self::default();
        *api.active.lock().unwrap() = active;
        *api.archived.lock().unwrap() = archived;
        api
    }

    /// Every following call fails with this HTTP status.
    pub fn fail_with(&self, status: u16) {
        *self.failing.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match *self.failing.lock().unwrap() {
            Some(status) => Err(ApiError::Status {
                status,
                body: "{\"message\":\"boom\"}".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn stored(&self, event_id: i64) -> Result<EventFullResponse, ApiError> {
        self.events
            .lock()
            .unwrap()
            .get(&event_id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            })
    }
}

#[async_trait]
impl EventsApi for FakeApi {
    async fn validate(&self) -> Result<(), ApiError> {
        self.record(Call::Validate)
    }

    async fn create_event(&self, request: &CreateEventRequest) -> Result<CreateEventResponse, ApiError> {
        self.record(Call::Create(request.clone()))?;
        Ok(CreateEventResponse {
            event: CreatedEventRef {
                id: 77,
                public_id: Some("0190a6b2-7c3e-7b4a-9f1e-2d3c4b5a6f70".to_string()),
            },
        })
    }

    async fn update_event(&self, event_id: i64, request: &UpdateEventRequest) -> Result<(), ApiError> {
        self.record(Call::Update(event_id, request.clone()))
    }

    async fn active_events(&self) -> Result<Vec<ActiveEvent>, ApiError> {
        self.record(Call::ActiveEvents)?;
        Ok(self.active.lock().unwrap().clone())
    }

    async fn archived_events(&self) -> Result<Vec<ArchivedEvent>, ApiError> {
        self.record(Call::ArchivedEvents)?;
        Ok(self.archived.lock().unwrap().clone())
    }

    async fn event(&self, event_id: i64) -> Result<EventFullResponse, ApiError> {
        self.record(Call::Event(event_id))?;
        self.stored(event_id)
    }

    async fn public_event(&self, public_id: &str) -> Result<EventFullResponse, ApiError> {
        self.record(Call::PublicEvent(public_id.to_string()))?;
        let events = self.events.lock().unwrap();
        events
            .values()
            .find(|e| e.event.public_id == public_id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            })
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.record(Call::Delete(event_id))
    }

    async fn unfinalize_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.record(Call::Unfinalize(event_id))
    }

    async fn submit_votes(&self, event_id: i64, slot_ids: &[i64]) -> Result<(), ApiError> {
        self.record(Call::Votes(event_id, slot_ids.to_vec()))
    }

    async fn finalize(&self, event_id: i64, slot_id: i64, location: Option<&str>) -> Result<(), ApiError> {
        self.record(Call::Finalize(event_id, slot_id, location.map(str::to_string)))
    }
}

pub const PUBLIC_ID: &str = "0190a6b2-7c3e-7b4a-9f1e-2d3c4b5a6f70";

pub fn at(iso: &str) -> DateTime<Utc> {
    timestamp::parse(iso).unwrap()
}

pub fn slot(id: i64, iso: &str, vote_count: u32) -> EventSlot {
    EventSlot {
        id,
        slot_start: at(iso),
        created_at: None,
        current_user_voted: false,
        vote_count,
        voters: Vec::new(),
    }
}

pub fn event(is_creator: bool, event_type: EventType, slots: Vec<EventSlot>) -> EventFullResponse {
    EventFullResponse {
        event: EventDetails {
            id: 10,
            public_id: PUBLIC_ID.to_string(),
            title: "Team dinner".to_string(),
            description: None,
            location: None,
            timezone: "Europe/Berlin".to_string(),
            event_type,
            multiple_choice: false,
            created_at: at("2024-06-01T08:00:00Z"),
            updated_at: None,
            deleted_at: None,
            user_id: 1,
            final_slot_id: None,
            is_creator,
            creator: None,
        },
        slots,
        participants: Vec::new(),
        current_user_votes: Vec::new(),
    }
}

pub fn listed(id: i64, is_creator: bool, participant_count: u32, final_slot_id: Option<i64>) -> ActiveEvent {
    ActiveEvent {
        id,
        public_id: format!("0190a6b2-7c3e-7b4a-9f1e-2d3c4b5a6f{id:02}"),
        title: format!("Event {id}"),
        event_type: EventType::Poll,
        is_creator,
        participant_count,
        final_slot_id,
        created_at: at("2024-06-01T08:00:00Z"),
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub host: Arc<RecordingBridge>,
    pub ctx: AppContext,
}

/// English-speaking user in Berlin, with the clock frozen at `now`.
pub fn harness(api: FakeApi, now: &str) -> Harness {
    let api = Arc::new(api);
    let host = Arc::new(RecordingBridge::new(LaunchParams {
        init_data: "query_id=AAE&user=%7B%22id%22%3A1%7D&hash=abc".to_string(),
        language_code: Some("en".to_string()),
        ..LaunchParams::default()
    }));
    let ctx = AppContext::new(api.clone(), host.clone(), chrono_tz::Europe::Berlin)
        .with_clock(Arc::new(FixedClock(at(now))));
    Harness { api, host, ctx }
}
