use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::i18n::Language;

/// Source of "now" for the flows, so time-dependent rules stay testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time in `tz`.
    fn local_now(&self, tz: Tz) -> NaiveDateTime {
        self.now().with_timezone(&tz).naive_local()
    }

    fn today(&self, tz: Tz) -> NaiveDate {
        self.local_now(tz).date()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an IANA zone name; blank falls back to UTC.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return Some(Tz::UTC);
    }
    name.parse().ok()
}

/// Date heading for a slot group: "August 18, Mon" or "18 августа, пн".
pub fn format_slot_date(instant: DateTime<Utc>, tz: Tz, language: Language) -> String {
    let local = instant.with_timezone(&tz);
    let weekday = language.weekday_short(local.weekday());
    match language {
        Language::En => format!(
            "{} {}, {}",
            language.month_in_date(local.month()),
            local.day(),
            weekday
        ),
        Language::Ru => format!(
            "{} {}, {}",
            local.day(),
            language.month_in_date(local.month()),
            weekday.to_lowercase()
        ),
    }
}

pub fn format_slot_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Long form used on the calendar export page.
pub fn format_full_datetime(instant: DateTime<Utc>, tz: Tz, language: Language) -> String {
    let local = instant.with_timezone(&tz);
    let weekday = language.weekday_long(local.weekday());
    let month = language.month_in_date(local.month());
    let time = local.format("%H:%M");
    match language {
        Language::En => format!("{}, {} {}, {} at {}", weekday, month, local.day(), local.year(), time),
        Language::Ru => format!("{}, {} {} {} г., {}", weekday, local.day(), month, local.year(), time),
    }
}
