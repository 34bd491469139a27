//! Scheduling data for a single event.
//!
//! An [`EventSchedule`] is the only input the lifecycle classifier reads:
//! a calendar date, a start time, an optional end time and the manual
//! cancellation override set by the creator.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Manual override applied on top of the time-derived lifecycle.
///
/// Stored as an empty string when no override is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManualState {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

/// Date and time window of an event plus its manual state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub manual_state: ManualState,
    /// Informational only, never consulted when classifying.
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl EventSchedule {
    /// Create a schedule with no manual override.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: Option<NaiveTime>) -> Self {
        Self {
            date,
            start_time,
            end_time,
            manual_state: ManualState::None,
            cancellation_reason: None,
        }
    }

    pub fn builder() -> EventScheduleBuilder {
        EventScheduleBuilder::default()
    }

    /// Start instant, in the same civil convention as the caller's `now`.
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// End instant, if the event has an end time.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end_time.map(|t| self.date.and_time(t))
    }

    pub fn is_cancelled(&self) -> bool {
        self.manual_state == ManualState::Cancelled
    }

    /// Apply the creator's cancel action.
    ///
    /// The reason is trimmed; a blank reason is stored as `None`.
    pub fn cancel(&mut self, reason: &str) {
        let reason = reason.trim();
        self.manual_state = ManualState::Cancelled;
        self.cancellation_reason = if reason.is_empty() {
            None
        } else {
            Some(reason.to_string())
        };
    }
}

/// Builder that enforces the presence of `date` and `start_time`.
#[derive(Debug, Clone, Default)]
pub struct EventScheduleBuilder {
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    manual_state: ManualState,
    cancellation_reason: Option<String>,
}

impl EventScheduleBuilder {
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: Option<NaiveTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn manual_state(mut self, manual_state: ManualState) -> Self {
        self.manual_state = manual_state;
        self
    }

    pub fn cancellation_reason(mut self, reason: Option<String>) -> Self {
        self.cancellation_reason = reason;
        self
    }

    /// Finish the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSchedule`] if `date` or `start_time`
    /// was never set.
    pub fn build(self) -> Result<EventSchedule, ScheduleError> {
        let date = self
            .date
            .ok_or(ScheduleError::InvalidSchedule { missing: "date" })?;
        let start_time = self
            .start_time
            .ok_or(ScheduleError::InvalidSchedule {
                missing: "start_time",
            })?;

        Ok(EventSchedule {
            date,
            start_time,
            end_time: self.end_time,
            manual_state: self.manual_state,
            cancellation_reason: self.cancellation_reason,
        })
    }
}
