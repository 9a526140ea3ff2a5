use serde::{Deserialize, Serialize};

use super::{DateKey, ScheduleError, SlotCollection, SlotTime, TimeSlot};

/// Repeat intervals offered by the template dialog, in minutes.
pub const REPEAT_OPTIONS: [u32; 5] = [15, 30, 60, 90, 120];

/// Evenly spaced times between a start (inclusive) and an end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTemplate {
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    /// Minutes between two generated times.
    pub repeat_interval: u32,
}

impl Default for TimeTemplate {
    fn default() -> Self {
        Self {
            start_time: SlotTime::new(9, 0).unwrap_or(SlotTime::NOON),
            end_time: SlotTime::new(17, 0).unwrap_or(SlotTime::END_OF_DAY),
            repeat_interval: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateTarget {
    AllSelected,
    Date(DateKey),
}

impl TimeTemplate {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.start_time >= self.end_time {
            return Err(ScheduleError::InvalidTemplateRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.repeat_interval == 0 {
            return Err(ScheduleError::ZeroInterval);
        }
        Ok(())
    }

    pub fn generate(&self) -> Result<Vec<SlotTime>, ScheduleError> {
        self.validate()?;
        let step = self.repeat_interval as usize;
        Ok((self.start_time.minutes()..self.end_time.minutes())
            .step_by(step)
            .filter_map(SlotTime::from_minutes)
            .collect())
    }
}

impl SlotCollection {
    /// Merges a template's times into the targeted dates.
    ///
    /// Existing slots are never touched, so slots that already carry votes
    /// survive; generated times already present on a date are skipped.
    /// Returns the number of slots added.
    pub fn apply_template(
        &mut self,
        template: &TimeTemplate,
        target: TemplateTarget,
    ) -> Result<usize, ScheduleError> {
        let times = template.generate()?;
        let dates: Vec<DateKey> = match target {
            TemplateTarget::AllSelected => self.dates().collect(),
            TemplateTarget::Date(date) => vec![date],
        };
        Ok(dates
            .into_iter()
            .map(|date| self.merge_times(date, &times))
            .sum())
    }

    /// Rebuilds the targeted dates from a template, used when editing a
    /// saved event.
    ///
    /// Slots accepted by `keep` (those that already collected votes) stay;
    /// every other slot on the date is replaced by the generated times.
    /// Generated times equal to a kept slot are skipped. Returns the number
    /// of slots added.
    pub fn replace_with_template(
        &mut self,
        template: &TimeTemplate,
        target: TemplateTarget,
        keep: impl Fn(&TimeSlot) -> bool,
    ) -> Result<usize, ScheduleError> {
        let times = template.generate()?;
        let dates: Vec<DateKey> = match target {
            TemplateTarget::AllSelected => self.dates().collect(),
            TemplateTarget::Date(date) => vec![date],
        };
        Ok(dates
            .into_iter()
            .map(|date| self.replace_times(date, &times, &keep))
            .sum())
    }
}
