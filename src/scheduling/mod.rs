//! Client-side scheduling model: calendar grid, per-date time slots,
//! templates, edit diffs, vote selection and optimistic snapshot updates.
//!
//! Everything here is synchronous and free of I/O; callers pass the current
//! wall-clock time explicitly.

pub mod calendar;
pub mod date_key;
pub mod diff;
pub mod slots;
pub mod snapshot;
pub mod template;
pub mod time;
pub mod voting;

pub use calendar::{CalendarCursor, CalendarDay, DatePicker, MonthGrid, SelectionPolicy};
pub use date_key::DateKey;
pub use diff::{build_update, has_changes, EventDraft};
pub use slots::{SlotCollection, SlotKey, TimeSlot};
pub use snapshot::{reduce, EventAction};
pub use template::{TemplateTarget, TimeTemplate};
pub use time::SlotTime;
pub use voting::{SubmitAction, VoteMode, VoteSession, VoteState};

use thiserror::Error;

/// Validation failures of the scheduling model. None of them mutate state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start time {start} must be before end time {end}")]
    InvalidTemplateRange { start: SlotTime, end: SlotTime },

    #[error("Repeat interval must be at least one minute")]
    ZeroInterval,

    #[error("Date {0} is not selected")]
    DateNotSelected(DateKey),

    #[error("Slot {0} does not exist")]
    UnknownSlot(SlotKey),

    #[error("{date} already has a slot at {time}")]
    DuplicateTime { date: DateKey, time: SlotTime },

    #[error("No free time left on {0} after the latest slot")]
    SlotTaken(DateKey),

    #[error("{time} does not exist on {date} in this timezone")]
    NonexistentLocalTime { date: DateKey, time: SlotTime },
}
