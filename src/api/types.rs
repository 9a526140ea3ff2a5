use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduling::SlotTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Poll,
    Booking,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Poll => "poll",
            EventType::Booking => "booking",
        }
    }
}

/// Row of the active/archived event lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBase {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub event_type: EventType,
    pub is_creator: bool,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub final_slot_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

pub type ActiveEvent = EventBase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedEvent {
    #[serde(flatten)]
    pub base: EventBase,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub is_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub telegram_user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl User {
    /// Name shown next to votes: full name, then @username, then the id.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        match &self.username {
            Some(username) if !username.is_empty() => format!("@{username}"),
            _ => self.telegram_user_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotVoter {
    #[serde(flatten)]
    pub user: User,
    #[serde(with = "timestamp")]
    pub voted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSlot {
    pub id: i64,
    #[serde(with = "timestamp")]
    pub slot_start: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_user_voted: bool,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub voters: Vec<SlotVoter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub event_type: EventType,
    #[serde(default)]
    pub multiple_choice: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub user_id: i64,
    #[serde(default)]
    pub final_slot_id: Option<i64>,
    #[serde(default)]
    pub is_creator: bool,
    #[serde(default)]
    pub creator: Option<User>,
}

impl EventDetails {
    pub fn is_finalized(&self) -> bool {
        self.final_slot_id.is_some()
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUserVote {
    pub slot_id: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// `GET events/:id` and `GET events/public/:publicId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFullResponse {
    pub event: EventDetails,
    #[serde(default)]
    pub slots: Vec<EventSlot>,
    #[serde(default)]
    pub participants: Vec<User>,
    #[serde(default)]
    pub current_user_votes: Vec<CurrentUserVote>,
}

impl EventFullResponse {
    pub fn slot(&self, slot_id: i64) -> Option<&EventSlot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub fn final_slot(&self) -> Option<&EventSlot> {
        self.event.final_slot_id.and_then(|id| self.slot(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSlots {
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "timeSlots")]
    pub time_slots: Vec<SlotTime>,
}

/// Body of `POST events/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub dates: Vec<DateSlots>,
    #[serde(rename = "allowMultipleChoice")]
    pub allow_multiple_choice: bool,
    pub timezone: String,
    #[serde(rename = "eventType")]
    pub event_type: EventType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEventRef {
    pub id: i64,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event: CreatedEventRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(with = "timestamp")]
    pub slot_start: DateTime<Utc>,
}

/// Body of `PUT events/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub event: EventPatch,
    pub slots: Vec<SlotPayload>,
    #[serde(rename = "deletedSlotIds")]
    pub deleted_slot_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub slot_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub slot_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Instants written like a browser's `toISOString()` and read leniently:
/// RFC 3339 with any offset, or a naive ISO timestamp taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_str(&super::format(value)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
                None => Ok(None),
            }
        }
    }
}
