//! Per-request time snapshot.
//!
//! Every decision in this crate takes the current time as an argument.
//! A [`Snapshot`] is taken once at the start of a request and threaded
//! through classification, visibility and the action gate so that no two
//! rules in the same response can disagree about "now".

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A single civil-time reading used for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Snapshot {
    now: NaiveDateTime,
}

impl Snapshot {
    /// Use an explicit instant.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Read the local wall clock once.
    pub fn capture() -> Self {
        Self::from_zoned(Local::now())
    }

    /// Civil time of a zoned instant, in that instant's own zone.
    pub fn from_zoned<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        Self {
            now: instant.naive_local(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }
}

impl From<NaiveDateTime> for Snapshot {
    fn from(now: NaiveDateTime) -> Self {
        Self::at(now)
    }
}
