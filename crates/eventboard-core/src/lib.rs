//! # Event Community Board Core Library
//!
//! Decision logic for a community events board. Persistence, HTTP routing,
//! authentication and rendering live in the surrounding application; this
//! crate receives plain snapshots of events and answers three questions:
//!
//! - what lifecycle an event is in right now ([`Lifecycle::classify`])
//! - whether it appears in public listings ([`VisibilityPolicy::is_visible`])
//! - which actions a user may take on it ([`event::check`])
//!
//! ## Time
//!
//! Nothing here reads the clock implicitly. Take one [`Snapshot`] per
//! request and pass it everywhere, so that the lifecycle shown, the
//! visibility decision and the action gate all use the same instant.
//!
//! ## Key Components
//!
//! - [`EventSchedule`]: date, times and manual cancellation of an event
//! - [`EventRecord`]: an event with its roster and announcements
//! - [`listing`]: public events list and "my events" page
//! - [`community`]: community list, membership and "my communities" page
//! - [`Config`]: TOML configuration (visibility windows, listing defaults)

pub mod clock;
pub mod community;
pub mod config;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod listing;
pub mod profile;
pub mod schedule;
pub mod visibility;

pub use clock::Snapshot;
pub use community::{Community, CommunityDraft, CommunityId, CommunityQuery, CommunitySort};
pub use config::Config;
pub use error::{ConfigError, CoreError, Result, ScheduleError, ValidationError};
pub use event::{
    ActionContext, Denial, Event, EventAction, EventDraft, EventId, EventRecord, JoinOutcome,
    Relationship, Roster, TagId, UserId,
};
pub use lifecycle::{classify, Lifecycle};
pub use listing::{build_listing, ListingEntry, ListingQuery, OwnershipFilter, RoleFilter, SortOrder};
pub use profile::Profile;
pub use schedule::{EventSchedule, ManualState};
pub use visibility::{is_visible, VisibilityPolicy};
