use askama_axum::Template;
use axum::{
    extract::{Query, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::{CalendarExport, CalendarQuery};
use crate::i18n::{Language, Message};
use crate::utils::datetime::format_full_datetime;
use crate::utils::logging::log_validation_error;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Clone)]
pub struct ExportState {
    /// Zone used to print the start time on the page.
    pub display_timezone: Tz,
    pub start_time: DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "calendar.html")]
struct CalendarPage {
    lang: &'static str,
    heading: &'static str,
    subtitle: &'static str,
    title: String,
    starts_at: String,
    description: Option<String>,
    location: Option<String>,
    google_label: &'static str,
    google_url: String,
    ics_label: &'static str,
    ics_url: String,
    hint: &'static str,
}

#[derive(Template)]
#[template(path = "calendar_error.html")]
struct CalendarErrorPage {
    lang: &'static str,
    heading: &'static str,
    error: &'static str,
}

pub struct ExportService {
    pub router: Router,
}

impl ExportService {
    pub fn new(display_timezone: Tz) -> Self {
        let state = ExportState {
            display_timezone,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/calendar", get(calendar_page))
            .route("/calendar.ics", get(calendar_ics))
            .route("/health", get(health_check))
            .route("/health/live", get(liveness_check))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

async fn calendar_page(
    State(state): State<ExportState>,
    Query(query): Query<CalendarQuery>,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let language = query.language();
    let export = match CalendarExport::from_query(&query) {
        Ok(export) => export,
        Err(e) => return error_page(language, e.message(), &e.to_string()),
    };

    CalendarPage {
        lang: language.code(),
        heading: language.text(Message::AddToCalendar),
        subtitle: language.text(Message::CalendarSubtitle),
        starts_at: format_full_datetime(export.start, state.display_timezone, language),
        google_label: language.text(Message::GoogleCalendar),
        google_url: export.google_calendar_url(),
        ics_label: language.text(Message::DownloadIcs),
        ics_url: format!("calendar.ics?{}", raw_query.unwrap_or_default()),
        hint: language.text(Message::YandexCalendarHint),
        title: export.title,
        description: export.description,
        location: export.location,
    }
    .into_response()
}

async fn calendar_ics(Query(query): Query<CalendarQuery>) -> Response {
    let language = query.language();
    let export = match CalendarExport::from_query(&query) {
        Ok(export) => export,
        Err(e) => return (StatusCode::BAD_REQUEST, language.text(e.message())).into_response(),
    };

    let uid = format!("{}@calendar-export", Uuid::new_v4());
    let body = export.to_ics(&uid, Utc::now());
    let disposition = content_disposition(&export.ics_file_name());

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/calendar; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn error_page(language: Language, message: Message, detail: &str) -> Response {
    log_validation_error("calendar_export", "query", detail);
    let page = CalendarErrorPage {
        lang: language.code(),
        heading: language.text(Message::AddToCalendar),
        error: language.text(message),
    };
    (StatusCode::BAD_REQUEST, page).into_response()
}

/// ASCII fallback name plus the UTF-8 form for clients that understand it.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|c| *c != '"')
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"event.ics\""))
}

async fn health_check(State(state): State<ExportState>) -> Json<HealthResponse> {
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
    })
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}
