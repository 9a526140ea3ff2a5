use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ScheduleError, SlotTime};

/// Calendar day used as the key of a slot collection, written as ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn at(self, time: SlotTime) -> NaiveDateTime {
        self.0.and_time(time.to_naive())
    }

    /// Resolves a wall-clock time on this day to an instant in `tz`.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant; times that
    /// fall into a DST gap do not exist and are rejected.
    pub fn instant_in(self, time: SlotTime, tz: Tz) -> Result<chrono::DateTime<Tz>, ScheduleError> {
        tz.from_local_datetime(&self.at(time))
            .earliest()
            .ok_or(ScheduleError::NonexistentLocalTime { date: self, time })
    }

    /// First existing instant of this day in `tz`: midnight, or 01:00 where
    /// the zone skips midnight.
    pub fn start_of_day(self, tz: Tz) -> Result<chrono::DateTime<Tz>, ScheduleError> {
        self.instant_in(SlotTime::MIDNIGHT, tz).or_else(|_| {
            let one_am = SlotTime::new(1, 0).unwrap_or(SlotTime::MIDNIGHT);
            self.instant_in(one_am, tz)
        })
    }

    pub fn is_same_month(self, other: NaiveDate) -> bool {
        self.0.year() == other.year() && self.0.month() == other.month()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ScheduleError::InvalidDate(s.to_string()))
    }
}
