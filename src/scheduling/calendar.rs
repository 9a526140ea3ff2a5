use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::HashSet;

use super::DateKey;
use crate::i18n::Language;

/// One cell of the month grid, derived fresh on every build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: DateKey,
    pub is_in_current_month: bool,
    pub is_past: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

impl CalendarDay {
    /// Tags `date` relative to the month being shown and to `today`.
    pub fn new(date: DateKey, shown_month: NaiveDate, today: NaiveDate, is_selected: bool) -> Self {
        Self {
            date,
            is_in_current_month: date.is_same_month(shown_month),
            is_past: date.date() < today,
            is_today: date.date() == today,
            is_selected,
        }
    }
}

/// Which days a user may tap, depending on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Only in-month days from today on.
    Create,
    /// Like `Create`, but past days that already carry slots stay tappable so
    /// they can be removed.
    Edit,
}

impl SelectionPolicy {
    pub fn can_select(self, day: &CalendarDay) -> bool {
        if !day.is_in_current_month {
            return false;
        }
        match self {
            SelectionPolicy::Create => !day.is_past,
            SelectionPolicy::Edit => !day.is_past || day.is_selected,
        }
    }
}

/// Rectangular grid of whole weeks covering a month.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn build(
        month_of: NaiveDate,
        today: NaiveDate,
        selected: impl IntoIterator<Item = DateKey>,
        week_start: Weekday,
    ) -> Self {
        let selected: HashSet<DateKey> = selected.into_iter().collect();
        let first = first_of_month(month_of);
        let offset = weekday_offset(first.weekday(), week_start);
        let total = (days_in_month(first.year(), first.month()) + offset).div_ceil(7) * 7;
        let grid_start = first - Days::new(u64::from(offset));

        let days = grid_start
            .iter_days()
            .take(total as usize)
            .map(|date| {
                let key = DateKey::new(date);
                CalendarDay::new(key, first, today, selected.contains(&key))
            })
            .collect();

        Self {
            year: first.year(),
            month: first.month(),
            days,
        }
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    pub fn title(&self, language: Language) -> String {
        format!("{} {}", language.month_name(self.month), self.year)
    }
}

/// The month currently shown by the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    current: NaiveDate,
}

impl CalendarCursor {
    pub fn new(current: NaiveDate) -> Self {
        Self { current }
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    pub fn previous_month(&mut self) {
        self.current = shift_months(self.current, -1);
    }

    pub fn next_month(&mut self) {
        self.current = shift_months(self.current, 1);
    }
}

/// Month navigation plus the tap rules of one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    pub cursor: CalendarCursor,
    pub policy: SelectionPolicy,
    pub week_start: Weekday,
}

impl DatePicker {
    pub fn new(shown_month: NaiveDate, policy: SelectionPolicy) -> Self {
        Self {
            cursor: CalendarCursor::new(shown_month),
            policy,
            week_start: Weekday::Mon,
        }
    }

    pub fn grid(&self, today: NaiveDate, selected: impl IntoIterator<Item = DateKey>) -> MonthGrid {
        MonthGrid::build(self.cursor.current(), today, selected, self.week_start)
    }

    pub fn can_select(&self, date: DateKey, today: NaiveDate, is_selected: bool) -> bool {
        let day = CalendarDay::new(date, self.cursor.current(), today, is_selected);
        self.policy.can_select(&day)
    }
}

/// Header labels aligned with a grid starting on `week_start`.
pub fn weekday_labels(language: Language, week_start: Weekday) -> Vec<&'static str> {
    let mut day = week_start;
    (0..7)
        .map(|_| {
            let label = language.weekday_short(day);
            day = day.succ();
            label
        })
        .collect()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn weekday_offset(day: Weekday, week_start: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// Month arithmetic with calendar-overflow rollover: Jan 31 plus one month
/// lands on Mar 2 (or Mar 3 in a common year) rather than being clamped.
fn shift_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 + delta;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first + Days::new(u64::from(date.day() - 1)),
        None => date,
    }
}
