//! Action gate.
//!
//! Decides which user actions are legal given a freshly computed
//! [`Lifecycle`] and the caller's [`Relationship`] to the event. The gate
//! never checks identity itself; the caller must have authenticated the
//! user before asking.
//!
//! | Action              | Lifecycle            | Also requires                  |
//! |---------------------|----------------------|--------------------------------|
//! | Edit                | upcoming, ongoing    | creator                        |
//! | Join                | upcoming, ongoing    | free seat, or already joined   |
//! | Leave               | any                  | previously joined              |
//! | Cancel              | upcoming, ongoing    | creator                        |
//! | Delete              | completed, cancelled | creator                        |
//! | PostAnnouncement    | upcoming, ongoing    | creator                        |
//! | EditAnnouncement    | all but completed    | creator                        |
//! | DeleteAnnouncement  | any                  | creator                        |

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::lifecycle::Lifecycle;

/// Caller's relationship to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relationship {
    /// Created the event (and is registered for it)
    Creator,
    /// Registered, not the creator
    Member,
    /// No relationship, including anonymous viewers
    Outsider,
}

impl Relationship {
    /// Creator or member.
    pub fn is_registered(self) -> bool {
        matches!(self, Relationship::Creator | Relationship::Member)
    }
}

/// Actions a user can attempt on an event or its announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Edit,
    Join,
    Leave,
    Cancel,
    Delete,
    PostAnnouncement,
    EditAnnouncement,
    DeleteAnnouncement,
}

impl EventAction {
    pub const ALL: [EventAction; 8] = [
        EventAction::Edit,
        EventAction::Join,
        EventAction::Leave,
        EventAction::Cancel,
        EventAction::Delete,
        EventAction::PostAnnouncement,
        EventAction::EditAnnouncement,
        EventAction::DeleteAnnouncement,
    ];
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventAction::Edit => "edit",
            EventAction::Join => "join",
            EventAction::Leave => "leave",
            EventAction::Cancel => "cancel",
            EventAction::Delete => "delete",
            EventAction::PostAnnouncement => "post_announcement",
            EventAction::EditAnnouncement => "edit_announcement",
            EventAction::DeleteAnnouncement => "delete_announcement",
        };
        f.write_str(name)
    }
}

/// Snapshot of everything the gate needs for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub lifecycle: Lifecycle,
    pub relationship: Relationship,
    /// Registrations at the time of the request, creator included.
    pub registration_count: usize,
    /// `None` means unlimited.
    pub max_participants: Option<u32>,
}

impl ActionContext {
    /// A limit of zero means no limit.
    fn has_free_seat(&self) -> bool {
        match self.max_participants {
            Some(max) if max > 0 => self.registration_count < max as usize,
            _ => true,
        }
    }
}

/// Why the gate refused an action.
///
/// Messages are the ones shown to the user after the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Denial {
    #[error("Only the event creator can do this.")]
    NotCreator,

    #[error("You have not joined this event.")]
    NotRegistered,

    #[error("This event can no longer be edited.")]
    EditClosed,

    #[error("You cannot join this event anymore.")]
    JoinClosed,

    #[error("This event cannot be cancelled anymore.")]
    CancelClosed,

    #[error("Only completed or cancelled events can be deleted.")]
    StillActive,

    #[error("Announcements can only be posted while the event is upcoming or ongoing.")]
    AnnouncementsClosed,

    #[error("This event is completed. Announcements can no longer be edited.")]
    AnnouncementsLocked,

    #[error("This event is already full.")]
    AtCapacity,

    #[error("You are not allowed to edit this community")]
    NotCommunityCreator,
}

/// Decide an action, returning the reason on refusal.
///
/// Ownership is checked before lifecycle, matching the order in which the
/// application reports problems (forbidden first, then state warnings).
pub fn check(action: EventAction, ctx: &ActionContext) -> Result<(), Denial> {
    let is_creator = ctx.relationship == Relationship::Creator;
    let require_creator = || if is_creator { Ok(()) } else { Err(Denial::NotCreator) };

    match action {
        EventAction::Edit => {
            require_creator()?;
            active_or(ctx.lifecycle, Denial::EditClosed)
        }
        EventAction::Join => {
            active_or(ctx.lifecycle, Denial::JoinClosed)?;
            if ctx.relationship.is_registered() || ctx.has_free_seat() {
                Ok(())
            } else {
                Err(Denial::AtCapacity)
            }
        }
        EventAction::Leave => {
            if ctx.relationship.is_registered() {
                Ok(())
            } else {
                Err(Denial::NotRegistered)
            }
        }
        EventAction::Cancel => {
            require_creator()?;
            active_or(ctx.lifecycle, Denial::CancelClosed)
        }
        EventAction::Delete => {
            require_creator()?;
            if ctx.lifecycle.is_closed() {
                Ok(())
            } else {
                Err(Denial::StillActive)
            }
        }
        EventAction::PostAnnouncement => {
            require_creator()?;
            active_or(ctx.lifecycle, Denial::AnnouncementsClosed)
        }
        EventAction::EditAnnouncement => {
            require_creator()?;
            if ctx.lifecycle == Lifecycle::Completed {
                Err(Denial::AnnouncementsLocked)
            } else {
                Ok(())
            }
        }
        EventAction::DeleteAnnouncement => require_creator(),
    }
}

/// Boolean form of [`check`].
pub fn is_permitted(action: EventAction, ctx: &ActionContext) -> bool {
    check(action, ctx).is_ok()
}

/// Every action the caller may currently take, in [`EventAction::ALL`] order.
pub fn permitted_actions(ctx: &ActionContext) -> Vec<EventAction> {
    EventAction::ALL
        .into_iter()
        .filter(|action| is_permitted(*action, ctx))
        .collect()
}

fn active_or(lifecycle: Lifecycle, denial: Denial) -> Result<(), Denial> {
    if lifecycle.is_active() {
        Ok(())
    } else {
        Err(denial)
    }
}
