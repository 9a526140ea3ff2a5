use std::fmt;
use uuid::{Uuid, Variant};

/// Screens the app can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Create,
    Archive,
    EventDetail(i64),
    EventEdit(i64),
    PublicEvent(Uuid),
    EnvUnsupported,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Create => write!(f, "/create"),
            Route::Archive => write!(f, "/archive"),
            Route::EventDetail(id) => write!(f, "/event/{id}"),
            Route::EventEdit(id) => write!(f, "/event/{id}/edit"),
            Route::PublicEvent(public_id) => write!(f, "/event/public/{public_id}"),
            Route::EnvUnsupported => write!(f, "/unsupported"),
        }
    }
}

const EVENT_PREFIX: &str = "ev:";

/// Decodes a `startapp` deep-link payload into the public event it points to.
///
/// Accepts an optional `ev:` prefix and percent-encoding; only hyphenated
/// UUIDs of versions 1 to 5 or 7 with the RFC variant are routed.
pub fn route_from_start_param(raw: &str) -> Option<Route> {
    let decoded = urlencoding::decode(raw.trim()).ok()?;
    let candidate = decoded.strip_prefix(EVENT_PREFIX).unwrap_or(&*decoded);
    parse_public_id(candidate).map(Route::PublicEvent)
}

pub fn parse_public_id(candidate: &str) -> Option<Uuid> {
    if candidate.len() != 36 {
        return None;
    }
    let uuid = Uuid::try_parse(candidate).ok()?;
    let version_ok = matches!(uuid.get_version_num(), 1..=5 | 7);
    (version_ok && uuid.get_variant() == Variant::RFC4122).then_some(uuid)
}
