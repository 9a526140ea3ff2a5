//! "Add to calendar" support for a finalized slot: a Google Calendar
//! template link and an RFC 5545 `.ics` payload.

pub mod server;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use urlencoding::encode;

use crate::api::types::{timestamp, EventDetails, EventSlot};
use crate::i18n::{Language, Message};

/// Length given to exported events.
pub const EVENT_DURATION_MINUTES: i64 = 30;

const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportError {
    #[error("No event data found in URL parameters")]
    MissingData,

    #[error("Invalid start time format")]
    InvalidStartTime,
}

impl ExportError {
    pub fn message(self) -> Message {
        match self {
            ExportError::MissingData => Message::NoEventData,
            ExportError::InvalidStartTime => Message::InvalidStartTime,
        }
    }
}

/// Query string of the companion page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub title: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub language_code: Option<String>,
}

impl CalendarQuery {
    pub fn language(&self) -> Language {
        Language::from_code(self.language_code.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExport {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarExport {
    pub fn from_query(query: &CalendarQuery) -> Result<Self, ExportError> {
        let title = non_blank(query.title.as_deref()).ok_or(ExportError::MissingData)?;
        let raw_start = non_blank(query.start_time.as_deref()).ok_or(ExportError::MissingData)?;
        let start = timestamp::parse(&raw_start).ok_or(ExportError::InvalidStartTime)?;

        Ok(Self {
            title,
            description: non_blank(query.description.as_deref()),
            location: non_blank(query.location.as_deref()),
            start,
            end: start + Duration::minutes(EVENT_DURATION_MINUTES),
        })
    }

    pub fn google_calendar_url(&self) -> String {
        let dates = format!("{}/{}", ics_stamp(self.start), ics_stamp(self.end));
        format!(
            "{}?action=TEMPLATE&text={}&dates={}&details={}&location={}",
            GOOGLE_CALENDAR_URL,
            encode(&self.title),
            encode(&dates),
            encode(self.description.as_deref().unwrap_or("")),
            encode(self.location.as_deref().unwrap_or("")),
        )
    }

    /// CRLF-joined VCALENDAR with a single VEVENT.
    pub fn to_ics(&self, uid: &str, dtstamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Calendar Export//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{uid}"),
            format!("DTSTAMP:{}", ics_stamp(dtstamp)),
            format!("DTSTART:{}", ics_stamp(self.start)),
            format!("DTEND:{}", ics_stamp(self.end)),
            format!("SUMMARY:{}", escape_ics_text(&self.title)),
        ];
        if let Some(description) = &self.description {
            lines.push(format!("DESCRIPTION:{}", escape_ics_text(description)));
        }
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_ics_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());
        lines.join("\r\n")
    }

    /// File name offered for the download.
    pub fn ics_file_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|') || c.is_control() { '_' } else { c })
            .collect();
        format!("{}.ics", stem.trim())
    }
}

/// Compact UTC form `YYYYMMDDTHHMMSSZ`, sub-seconds dropped.
pub fn ics_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes backslash, semicolon, comma and newline, in that order.
pub fn escape_ics_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\n")
        .replace('\n', "\\n")
}

/// Companion page link for a finalized slot.
pub fn calendar_page_url(base: &str, event: &EventDetails, slot: &EventSlot, language: Language) -> String {
    let mut url = format!(
        "{}?title={}&startTime={}&language_code={}",
        base,
        encode(&event.title),
        encode(&timestamp::format(&slot.slot_start)),
        language.code()
    );
    if let Some(description) = non_blank(event.description.as_deref()) {
        url.push_str("&description=");
        url.push_str(&encode(&description));
    }
    if let Some(location) = non_blank(event.location.as_deref()) {
        url.push_str("&location=");
        url.push_str(&encode(&location));
    }
    url
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::test_support::{event_with_slots, slot_at};

    fn query(title: &str, start: &str) -> CalendarQuery {
        CalendarQuery {
            title: Some(title.into()),
            start_time: Some(start.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_end_is_thirty_minutes_after_start() {
        let export = CalendarExport::from_query(&query("Standup", "2024-05-01T09:00:00Z")).unwrap();
        assert_eq!(ics_stamp(export.start), "20240501T090000Z");
        assert_eq!(ics_stamp(export.end), "20240501T093000Z");
    }

    #[test]
    fn test_missing_or_invalid_query() {
        assert_eq!(CalendarExport::from_query(&CalendarQuery::default()), Err(ExportError::MissingData));
        assert_eq!(
            CalendarExport::from_query(&query("", "2024-05-01T09:00:00Z")),
            Err(ExportError::MissingData)
        );
        assert_eq!(
            CalendarExport::from_query(&query("Standup", "next tuesday")),
            Err(ExportError::InvalidStartTime)
        );
    }

    #[test]
    fn test_google_url() {
        let mut q = query("Team sync", "2024-05-01T09:00:00.000Z");
        q.location = Some("Room 1".into());
        let url = CalendarExport::from_query(&q).unwrap().google_calendar_url();
        assert_eq!(
            url,
            "https://calendar.google.com/calendar/render?action=TEMPLATE&text=Team%20sync\
             &dates=20240501T090000Z%2F20240501T093000Z&details=&location=Room%201"
        );
    }

    #[test]
    fn test_ics_layout_and_escaping() {
        let mut q = query("Lunch; team, all", "2024-05-01T12:00:00Z");
        q.description = Some("line one\nline two \\ end".into());
        let export = CalendarExport::from_query(&q).unwrap();
        let ics = export.to_ics("abc@calendar-export", export.start);
        let lines: Vec<&str> = ics.split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "PRODID:-//Calendar Export//EN",
                "BEGIN:VEVENT",
                "UID:abc@calendar-export",
                "DTSTAMP:20240501T120000Z",
                "DTSTART:20240501T120000Z",
                "DTEND:20240501T123000Z",
                "SUMMARY:Lunch\\; team\\, all",
                "DESCRIPTION:line one\\nline two \\\\ end",
                "END:VEVENT",
                "END:VCALENDAR",
            ]
        );
    }

    #[test]
    fn test_ics_file_name() {
        let export = CalendarExport::from_query(&query("a/b: c", "2024-05-01T12:00:00Z")).unwrap();
        assert_eq!(export.ics_file_name(), "a_b_ c.ics");
    }

    #[test]
    fn test_calendar_page_url_round_trips_through_query() {
        let mut event = event_with_slots(vec![slot_at(3, "2024-06-01T18:00:00Z")]);
        event.event.title = "Board games & pizza".into();
        event.event.location = Some("Main st. 5".into());
        let url = calendar_page_url(
            "https://app.example/calendar",
            &event.event,
            &event.slots[0],
            Language::Ru,
        );
        assert!(url.starts_with("https://app.example/calendar?title=Board%20games%20%26%20pizza&startTime=2024-06-01T18%3A00%3A00.000Z"));
        assert!(url.contains("&language_code=ru"));
        assert!(url.ends_with("&location=Main%20st.%205"));
        assert!(!url.contains("description="));
    }
}
