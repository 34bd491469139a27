//! User-submitted event data and its validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::TagId;
use crate::error::ValidationError;
use crate::schedule::EventSchedule;

/// Limits enforced on submitted events.
pub mod constraints {
    pub const TITLE_MAX: usize = 100;
    pub const INTEREST_MAX: usize = 50;
    pub const LOCATION_MAX: usize = 100;
    pub const MAX_TAGS: usize = 5;
}

/// Fields a creator fills in when creating or editing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

impl EventDraft {
    /// Check every form rule.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_required("title", &self.title)?;
        check_required("interest", &self.interest)?;
        check_required("location", &self.location)?;
        check_len("title", &self.title, constraints::TITLE_MAX)?;
        check_len("interest", &self.interest, constraints::INTEREST_MAX)?;
        check_len("location", &self.location, constraints::LOCATION_MAX)?;

        self.schedule()?;

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(ValidationError::EndBeforeStart);
            }
        }

        if self.tags.len() > constraints::MAX_TAGS {
            return Err(ValidationError::TooManyTags {
                max: constraints::MAX_TAGS,
            });
        }

        if self.max_participants == Some(0) {
            return Err(ValidationError::ZeroCapacity);
        }

        Ok(())
    }

    /// Build the schedule described by this draft, with no manual state.
    pub fn schedule(&self) -> Result<EventSchedule, ValidationError> {
        let mut builder = EventSchedule::builder().end_time(self.end_time);
        if let Some(date) = self.date {
            builder = builder.date(date);
        }
        if let Some(start) = self.start_time {
            builder = builder.start_time(start);
        }
        Ok(builder.build()?)
    }
}

fn check_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}
