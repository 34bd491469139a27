//! Event lifecycle derivation.
//!
//! The lifecycle is never stored. It is derived from an [`EventSchedule`]
//! and the request's `now`, with strict priority:
//!
//!   manual CANCELLED ──> CANCELLED
//!   now >  end       ──> COMPLETED
//!   now <  start     ──> UPCOMING
//!   otherwise        ──> ONGOING
//!
//! An event without an end time never completes by time alone.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schedule::EventSchedule;

/// Derived state of an event at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Not started yet
    Upcoming,
    /// Started and not yet past its end time
    Ongoing,
    /// Past its end time
    Completed,
    /// Cancelled by the creator (overrides every time rule)
    Cancelled,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 4] = [
        Lifecycle::Upcoming,
        Lifecycle::Ongoing,
        Lifecycle::Completed,
        Lifecycle::Cancelled,
    ];

    /// Classify a schedule at `now`.
    pub fn classify(schedule: &EventSchedule, now: NaiveDateTime) -> Self {
        if schedule.is_cancelled() {
            return Lifecycle::Cancelled;
        }

        if let Some(end) = schedule.end() {
            if now > end {
                return Lifecycle::Completed;
            }
        }

        if now < schedule.start() {
            return Lifecycle::Upcoming;
        }

        Lifecycle::Ongoing
    }

    /// Upcoming or ongoing.
    pub fn is_active(self) -> bool {
        matches!(self, Lifecycle::Upcoming | Lifecycle::Ongoing)
    }

    /// Completed or cancelled.
    pub fn is_closed(self) -> bool {
        !self.is_active()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Upcoming => "upcoming",
            Lifecycle::Ongoing => "ongoing",
            Lifecycle::Completed => "completed",
            Lifecycle::Cancelled => "cancelled",
        }
    }
}

/// Free-function form of [`Lifecycle::classify`].
pub fn classify(schedule: &EventSchedule, now: NaiveDateTime) -> Lifecycle {
    Lifecycle::classify(schedule, now)
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized lifecycle label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle: {0}")]
pub struct ParseLifecycleError(pub String);

impl FromStr for Lifecycle {
    type Err = ParseLifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Lifecycle::Upcoming),
            "ongoing" => Ok(Lifecycle::Ongoing),
            "completed" => Ok(Lifecycle::Completed),
            "cancelled" => Ok(Lifecycle::Cancelled),
            _ => Err(ParseLifecycleError(s.to_string())),
        }
    }
}
