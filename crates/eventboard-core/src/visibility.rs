//! Visibility of closed events in public listings.
//!
//! Upcoming and ongoing events are always listed. Completed and cancelled
//! events stay listed for a configurable number of days and then drop out.
//! A window of `0` hides them immediately. Fetching a single event by id is
//! never subject to this filter.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;
use crate::schedule::EventSchedule;

fn default_retention_days() -> u32 {
    7
}

/// Retention windows for closed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// Days a completed event stays listed, counted from its end.
    #[serde(default = "default_retention_days")]
    pub hide_completed_after_days: u32,
    /// Days a cancelled event stays listed, counted from its start.
    #[serde(default = "default_retention_days")]
    pub hide_cancelled_after_days: u32,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            hide_completed_after_days: default_retention_days(),
            hide_cancelled_after_days: default_retention_days(),
        }
    }
}

impl VisibilityPolicy {
    /// Policy applied when no settings record exists.
    pub const HIDE_IMMEDIATELY: VisibilityPolicy = VisibilityPolicy {
        hide_completed_after_days: 0,
        hide_cancelled_after_days: 0,
    };

    pub fn new(hide_completed_after_days: u32, hide_cancelled_after_days: u32) -> Self {
        Self {
            hide_completed_after_days,
            hide_cancelled_after_days,
        }
    }

    /// Resolve an optional settings record.
    pub fn or_hide_immediately(settings: Option<VisibilityPolicy>) -> Self {
        settings.unwrap_or(Self::HIDE_IMMEDIATELY)
    }

    /// Whether an event with the given lifecycle appears in listings.
    ///
    /// `lifecycle` must be the value already computed for this request.
    pub fn is_visible(
        &self,
        schedule: &EventSchedule,
        lifecycle: Lifecycle,
        now: NaiveDateTime,
    ) -> bool {
        match lifecycle {
            Lifecycle::Upcoming | Lifecycle::Ongoing => true,
            Lifecycle::Completed => match schedule.end() {
                Some(end) => within_window(end, now, self.hide_completed_after_days),
                None => false,
            },
            Lifecycle::Cancelled => {
                within_window(schedule.start(), now, self.hide_cancelled_after_days)
            }
        }
    }
}

/// Free-function form of [`VisibilityPolicy::is_visible`].
pub fn is_visible(
    schedule: &EventSchedule,
    lifecycle: Lifecycle,
    policy: &VisibilityPolicy,
    now: NaiveDateTime,
) -> bool {
    policy.is_visible(schedule, lifecycle, now)
}

fn within_window(reference: NaiveDateTime, now: NaiveDateTime, days: u32) -> bool {
    if days == 0 {
        return false;
    }
    now - reference <= Duration::days(i64::from(days))
}
