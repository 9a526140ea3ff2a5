use chrono::{NaiveDateTime, Timelike};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::fmt;

use super::{DateKey, ScheduleError, SlotTime};
use crate::api::types::EventSlot;

/// Minutes a slot proposed for today must lie ahead of the current time.
pub const TODAY_LEAD_MINUTES: u32 = 15;

/// Identity of a slot inside one collection, stable across re-sorting and
/// never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(u64);

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: SlotKey,
    pub time: SlotTime,
    /// Present when the slot already exists on the server.
    pub server_id: Option<i64>,
    /// Insertion order, kept for bookkeeping only.
    pub original_index: usize,
}

/// Result of tapping a day in the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateToggle {
    Added(SlotKey),
    Removed(Vec<TimeSlot>),
}

/// Per-date lists of proposed times.
///
/// The set of selected dates is exactly the key set of the map, so it is
/// always sorted and a date without slots cannot exist.
#[derive(Debug, Clone, Default)]
pub struct SlotCollection {
    dates: BTreeMap<DateKey, Vec<TimeSlot>>,
    next_key: u64,
    next_index: usize,
}

impl SlotCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the editable collection from persisted slots, placing each
    /// instant on the user's wall clock in `tz`.
    pub fn from_server_slots(slots: &[EventSlot], tz: Tz) -> Self {
        let mut collection = Self::new();
        for slot in slots {
            let local = slot.slot_start.with_timezone(&tz).naive_local();
            let date = DateKey::new(local.date());
            let time = SlotTime::from(local.time());
            if collection.contains_time(date, time) {
                tracing::warn!("Skipping duplicate server slot {} at {} {}", slot.id, date, time);
                continue;
            }
            collection.push(date, time, Some(slot.id));
        }
        collection
    }

    pub fn contains_date(&self, date: DateKey) -> bool {
        self.dates.contains_key(&date)
    }

    pub fn contains_time(&self, date: DateKey, time: SlotTime) -> bool {
        self.dates
            .get(&date)
            .is_some_and(|slots| slots.iter().any(|s| s.time == time))
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Selected dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.dates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateKey, &[TimeSlot])> {
        self.dates.iter().map(|(date, slots)| (*date, slots.as_slice()))
    }

    pub fn total_slots(&self) -> usize {
        self.dates.values().map(Vec::len).sum()
    }

    /// Slots in insertion order.
    pub fn slots(&self, date: DateKey) -> &[TimeSlot] {
        self.dates.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Sorted copy for display.
    pub fn display_slots(&self, date: DateKey) -> Vec<TimeSlot> {
        let mut slots = self.slots(date).to_vec();
        slots.sort_by_key(|s| s.time);
        slots
    }

    /// Adds the date with one default slot, or drops it with all its slots.
    pub fn select_date(&mut self, date: DateKey, now: NaiveDateTime) -> DateToggle {
        if let Some(removed) = self.dates.remove(&date) {
            return DateToggle::Removed(removed);
        }
        let key = self.push(date, default_slot_time(date, now), None);
        DateToggle::Added(key)
    }

    pub fn remove_date(&mut self, date: DateKey) -> Option<Vec<TimeSlot>> {
        self.dates.remove(&date)
    }

    pub fn clear(&mut self) {
        self.dates.clear();
    }

    /// Proposes the next time after the latest slot of the day.
    pub fn add_slot(&mut self, date: DateKey, now: NaiveDateTime) -> Result<SlotKey, ScheduleError> {
        let latest = self.slots(date).iter().map(|s| s.time).max();
        let time = match latest {
            None => default_slot_time(date, now),
            Some(latest) => {
                let mut candidate = latest.saturating_add(60);
                while self.contains_time(date, candidate) {
                    if candidate == SlotTime::END_OF_DAY {
                        return Err(ScheduleError::SlotTaken(date));
                    }
                    candidate = candidate.saturating_add(15);
                }
                candidate
            }
        };
        Ok(self.push(date, time, None))
    }

    /// Removes one slot; the date goes away with its last slot.
    pub fn remove_slot(&mut self, date: DateKey, key: SlotKey) -> Result<TimeSlot, ScheduleError> {
        let slots = self
            .dates
            .get_mut(&date)
            .ok_or(ScheduleError::DateNotSelected(date))?;
        let position = slots
            .iter()
            .position(|s| s.id == key)
            .ok_or(ScheduleError::UnknownSlot(key))?;
        let removed = slots.remove(position);
        if slots.is_empty() {
            self.dates.remove(&date);
        }
        Ok(removed)
    }

    /// Rewrites a slot's time and returns the value actually stored.
    ///
    /// On today's date a time earlier than `now + 15 min` is moved forward to
    /// that bound.
    pub fn update_slot_time(
        &mut self,
        date: DateKey,
        key: SlotKey,
        time: SlotTime,
        now: NaiveDateTime,
    ) -> Result<SlotTime, ScheduleError> {
        let time = if date.date() == now.date() {
            time.max(earliest_today(now))
        } else {
            time
        };
        let slots = self
            .dates
            .get_mut(&date)
            .ok_or(ScheduleError::DateNotSelected(date))?;
        if slots.iter().any(|s| s.id != key && s.time == time) {
            return Err(ScheduleError::DuplicateTime { date, time });
        }
        let slot = slots
            .iter_mut()
            .find(|s| s.id == key)
            .ok_or(ScheduleError::UnknownSlot(key))?;
        slot.time = time;
        Ok(time)
    }

    /// Appends the times not yet present on `date`; returns how many were added.
    pub(super) fn merge_times(&mut self, date: DateKey, times: &[SlotTime]) -> usize {
        let mut added = 0;
        for &time in times {
            if !self.contains_time(date, time) {
                self.push(date, time, None);
                added += 1;
            }
        }
        added
    }

    /// Drops the slots of `date` that `keep` rejects, then merges `times`
    /// around the survivors. Returns how many slots were added.
    pub(super) fn replace_times(
        &mut self,
        date: DateKey,
        times: &[SlotTime],
        keep: impl Fn(&TimeSlot) -> bool,
    ) -> usize {
        if let Some(slots) = self.dates.get_mut(&date) {
            slots.retain(|slot| keep(slot));
        }
        let added = self.merge_times(date, times);
        if self.dates.get(&date).is_some_and(Vec::is_empty) {
            self.dates.remove(&date);
        }
        added
    }

    fn push(&mut self, date: DateKey, time: SlotTime, server_id: Option<i64>) -> SlotKey {
        self.next_key += 1;
        let id = SlotKey(self.next_key);
        let slot = TimeSlot {
            id,
            time,
            server_id,
            original_index: self.next_index,
        };
        self.next_index += 1;
        self.dates.entry(date).or_default().push(slot);
        id
    }
}

/// Noon, unless the date is today and noon has passed: then `now + 15 min`.
pub fn default_slot_time(date: DateKey, now: NaiveDateTime) -> SlotTime {
    if date.date() == now.date() && now.hour() >= 12 {
        earliest_today(now)
    } else {
        SlotTime::NOON
    }
}

fn earliest_today(now: NaiveDateTime) -> SlotTime {
    SlotTime::from(now.time()).saturating_add(TODAY_LEAD_MINUTES)
}
