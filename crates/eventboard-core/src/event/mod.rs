//! Events, registrations and the actions users take on them.
//!
//! - [`Event`]: the event entity as handed over by the storage layer
//! - [`Roster`]: set of registered users, joined idempotently
//! - [`EventRecord`]: an event with its roster and announcements, exposing
//!   gated operations evaluated against one [`crate::Snapshot`]
//! - [`actions`]: the pure action gate

pub mod actions;
mod draft;
mod record;

pub use actions::{
    check, is_permitted, permitted_actions, ActionContext, Denial, EventAction, Relationship,
};
pub use draft::{constraints, EventDraft};
pub use record::{Announcement, EventRecord};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ValidationError;
use crate::lifecycle::Lifecycle;
use crate::schedule::EventSchedule;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Event identifier, increasing with creation order.
    EventId
);
id_type!(
    /// User identifier.
    UserId
);
id_type!(
    /// Tag identifier.
    TagId
);
id_type!(
    /// Announcement identifier.
    AnnouncementId
);

/// An event as loaded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<TagId>,
    pub schedule: EventSchedule,
    /// `None` means unlimited.
    #[serde(default)]
    pub max_participants: Option<u32>,
    pub created_by: UserId,
}

impl Event {
    /// Create an event from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns the first failing form rule.
    pub fn from_draft(
        id: EventId,
        draft: &EventDraft,
        created_by: UserId,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            title: draft.title.trim().to_string(),
            interest: draft.interest.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            tags: draft.tags.clone(),
            schedule: draft.schedule()?,
            max_participants: draft.max_participants,
            created_by,
        })
    }

    /// Overwrite the editable fields, keeping id, creator and manual state.
    pub(crate) fn apply_draft(&mut self, draft: &EventDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        let mut schedule = draft.schedule()?;
        schedule.manual_state = self.schedule.manual_state;
        schedule.cancellation_reason = self.schedule.cancellation_reason.clone();

        self.title = draft.title.trim().to_string();
        self.interest = draft.interest.clone();
        self.description = draft.description.clone();
        self.location = draft.location.clone();
        self.tags = draft.tags.clone();
        self.max_participants = draft.max_participants;
        self.schedule = schedule;
        Ok(())
    }

    pub fn lifecycle(&self, now: NaiveDateTime) -> Lifecycle {
        Lifecycle::classify(&self.schedule, now)
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Relationship of `viewer` (`None` for anonymous) to this event.
    pub fn relationship(&self, viewer: Option<UserId>, roster: &Roster) -> Relationship {
        match viewer {
            Some(user) if user == self.created_by => Relationship::Creator,
            Some(user) if roster.contains(user) => Relationship::Member,
            _ => Relationship::Outsider,
        }
    }
}

/// Result of a join attempt that passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// Users registered for an event or community.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: BTreeSet<UserId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a registration.
    pub fn join(&mut self, user: UserId) -> JoinOutcome {
        if self.members.insert(user) {
            JoinOutcome::Joined
        } else {
            JoinOutcome::AlreadyJoined
        }
    }

    /// Remove a registration, returning whether one existed.
    pub fn leave(&mut self, user: UserId) -> bool {
        self.members.remove(&user)
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.members.iter().copied()
    }
}

impl FromIterator<UserId> for Roster {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
