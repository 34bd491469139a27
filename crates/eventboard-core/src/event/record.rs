//! Gated operations on a single event.
//!
//! Each operation classifies the event exactly once against the supplied
//! [`Snapshot`], asks the action gate, and only then mutates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::actions::{self, ActionContext, Denial, EventAction, Relationship};
use super::{AnnouncementId, Event, EventDraft, EventId, JoinOutcome, Roster, UserId};
use crate::clock::Snapshot;
use crate::error::{CoreError, ValidationError};
use crate::lifecycle::Lifecycle;

/// Creator notice attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub created_by: UserId,
}

/// An event together with its registrations and announcements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

impl EventRecord {
    /// Wrap an existing event and its registrations.
    pub fn new(event: Event, roster: Roster) -> Self {
        Self {
            event,
            roster,
            announcements: Vec::new(),
        }
    }

    /// Create an event; the creator is registered automatically.
    pub fn create(
        id: EventId,
        draft: &EventDraft,
        creator: UserId,
    ) -> Result<Self, ValidationError> {
        let event = Event::from_draft(id, draft, creator)?;
        let mut roster = Roster::new();
        roster.join(creator);
        info!("Created event {} by user {}", id, creator);
        Ok(Self::new(event, roster))
    }

    pub fn id(&self) -> EventId {
        self.event.id
    }

    pub fn lifecycle(&self, snapshot: &Snapshot) -> Lifecycle {
        self.event.lifecycle(snapshot.now())
    }

    pub fn relationship(&self, viewer: Option<UserId>) -> Relationship {
        self.event.relationship(viewer, &self.roster)
    }

    pub fn join_count(&self) -> usize {
        self.roster.len()
    }

    /// Gate input for `viewer` at `snapshot`.
    pub fn context(&self, viewer: Option<UserId>, snapshot: &Snapshot) -> ActionContext {
        ActionContext {
            lifecycle: self.lifecycle(snapshot),
            relationship: self.relationship(viewer),
            registration_count: self.roster.len(),
            max_participants: self.event.max_participants,
        }
    }

    /// Actions `viewer` may take right now.
    pub fn permitted_actions(&self, viewer: Option<UserId>, snapshot: &Snapshot) -> Vec<EventAction> {
        actions::permitted_actions(&self.context(viewer, snapshot))
    }

    fn gate(&self, action: EventAction, user: UserId, snapshot: &Snapshot) -> Result<(), Denial> {
        let ctx = self.context(Some(user), snapshot);
        actions::check(action, &ctx).inspect_err(|denial| {
            debug!(
                "Denied {} on event {} for user {} ({}): {}",
                action, self.event.id, user, ctx.lifecycle, denial
            );
        })
    }

    /// Register `user`. Joining twice is a successful no-op.
    pub fn join(&mut self, user: UserId, snapshot: &Snapshot) -> Result<JoinOutcome, Denial> {
        self.gate(EventAction::Join, user, snapshot)?;
        let outcome = self.roster.join(user);
        if outcome == JoinOutcome::Joined {
            info!("User {} joined event {}", user, self.event.id);
        }
        Ok(outcome)
    }

    /// Drop `user`'s registration.
    pub fn leave(&mut self, user: UserId, snapshot: &Snapshot) -> Result<(), Denial> {
        self.gate(EventAction::Leave, user, snapshot)?;
        self.roster.leave(user);
        info!("User {} left event {}", user, self.event.id);
        Ok(())
    }

    /// Apply an edit from the creator.
    pub fn edit(
        &mut self,
        user: UserId,
        draft: &EventDraft,
        snapshot: &Snapshot,
    ) -> Result<(), CoreError> {
        self.gate(EventAction::Edit, user, snapshot)?;
        self.event.apply_draft(draft)?;
        info!("Event {} edited by user {}", self.event.id, user);
        Ok(())
    }

    /// Cancel the event with an optional free-text reason.
    pub fn cancel(&mut self, user: UserId, reason: &str, snapshot: &Snapshot) -> Result<(), Denial> {
        self.gate(EventAction::Cancel, user, snapshot)?;
        self.event.schedule.cancel(reason);
        info!("Event {} cancelled by user {}", self.event.id, user);
        Ok(())
    }

    /// Check that `user` may delete the event. Removal itself is the
    /// caller's job.
    pub fn authorize_delete(&self, user: UserId, snapshot: &Snapshot) -> Result<(), Denial> {
        self.gate(EventAction::Delete, user, snapshot)?;
        info!("Event {} cleared for deletion by user {}", self.event.id, user);
        Ok(())
    }

    /// Post an announcement. An empty message is ignored and returns `None`.
    pub fn post_announcement(
        &mut self,
        user: UserId,
        id: AnnouncementId,
        message: &str,
        snapshot: &Snapshot,
    ) -> Result<Option<&Announcement>, Denial> {
        self.gate(EventAction::PostAnnouncement, user, snapshot)?;
        if message.is_empty() {
            return Ok(None);
        }
        self.announcements.push(Announcement {
            id,
            message: message.to_string(),
            created_at: snapshot.now(),
            created_by: user,
        });
        info!("Announcement {} posted on event {}", id, self.event.id);
        Ok(self.announcements.last())
    }

    /// Replace an announcement's text. An empty message leaves it unchanged.
    ///
    /// Returns `Ok(false)` if no announcement has that id.
    pub fn edit_announcement(
        &mut self,
        user: UserId,
        id: AnnouncementId,
        message: &str,
        snapshot: &Snapshot,
    ) -> Result<bool, Denial> {
        self.gate(EventAction::EditAnnouncement, user, snapshot)?;
        let Some(announcement) = self.announcements.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        if !message.is_empty() {
            announcement.message = message.to_string();
        }
        Ok(true)
    }

    /// Remove an announcement, allowed in every lifecycle.
    pub fn delete_announcement(
        &mut self,
        user: UserId,
        id: AnnouncementId,
        snapshot: &Snapshot,
    ) -> Result<bool, Denial> {
        self.gate(EventAction::DeleteAnnouncement, user, snapshot)?;
        let before = self.announcements.len();
        self.announcements.retain(|a| a.id != id);
        Ok(self.announcements.len() != before)
    }

    /// Announcements, newest first.
    pub fn announcements_newest_first(&self) -> Vec<&Announcement> {
        let mut list: Vec<&Announcement> = self.announcements.iter().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }
}
