//! Public event listing and the "my events" page.
//!
//! A listing is built from independent narrowing predicates (search, tag,
//! visibility, lifecycle, role) that are intersected, then sorted. The
//! lifecycle of each event is computed once and carried on the entry so
//! that filtering, sorting and rendering all agree.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::clock::Snapshot;
use crate::event::{EventRecord, Relationship, TagId, UserId};
use crate::lifecycle::Lifecycle;
use crate::visibility::VisibilityPolicy;

/// Narrowing by the viewer's relationship to the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    All,
    /// Events the viewer created
    Created,
    /// Events the viewer joined but did not create
    Joined,
    /// Events the viewer neither joined nor created
    NotJoined,
}

impl RoleFilter {
    pub fn matches(self, relationship: Relationship) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Created => relationship == Relationship::Creator,
            RoleFilter::Joined => relationship == Relationship::Member,
            RoleFilter::NotJoined => relationship == Relationship::Outsider,
        }
    }
}

/// Narrowing by derived lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleFilter {
    #[default]
    All,
    Only(Lifecycle),
    /// An unrecognized label; matches nothing.
    Unmatched,
}

impl LifecycleFilter {
    pub fn matches(self, lifecycle: Lifecycle) -> bool {
        match self {
            LifecycleFilter::All => true,
            LifecycleFilter::Only(wanted) => wanted == lifecycle,
            LifecycleFilter::Unmatched => false,
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// By event date, earliest first
    #[default]
    Upcoming,
    /// By registration count, highest first
    Popular,
    /// By id, most recently created first
    Newest,
}

/// Unrecognized listing parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseListingError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for RoleFilter {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(RoleFilter::All),
            "created" => Ok(RoleFilter::Created),
            "joined" => Ok(RoleFilter::Joined),
            "not_joined" => Ok(RoleFilter::NotJoined),
            _ => Err(ParseListingError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(SortOrder::Upcoming),
            "popular" => Ok(SortOrder::Popular),
            "newest" => Ok(SortOrder::Newest),
            _ => Err(ParseListingError {
                kind: "sort",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for LifecycleFilter {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(LifecycleFilter::All);
        }
        s.parse::<Lifecycle>()
            .map(LifecycleFilter::Only)
            .map_err(|_| ParseListingError {
                kind: "lifecycle",
                value: s.to_string(),
            })
    }
}

/// Parameters of the public events list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Case-insensitive title substring
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub tag: Option<TagId>,
    #[serde(default)]
    pub role: RoleFilter,
    #[serde(default)]
    pub lifecycle: LifecycleFilter,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ListingQuery {
    /// Build a query from raw request parameters (`q`, `tag`, `sort`,
    /// `role`, `lifecycle`).
    ///
    /// Unknown sort and role values fall back to the defaults; an unknown
    /// lifecycle label matches nothing; a non-numeric tag is ignored.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::from_params_with_default(params, SortOrder::default())
    }

    /// Like [`from_params`](Self::from_params) with a different fallback
    /// sort order.
    pub fn from_params_with_default<'a, I>(params: I, default_sort: SortOrder) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self {
            sort: default_sort,
            ..Self::default()
        };
        for (key, value) in params {
            match key {
                "q" if !value.is_empty() => query.search = Some(value.to_string()),
                "tag" => query.tag = value.parse().ok().map(TagId),
                "sort" => query.sort = value.parse().unwrap_or(default_sort),
                "role" => query.role = value.parse().unwrap_or_default(),
                "lifecycle" => {
                    query.lifecycle = value.parse().unwrap_or(LifecycleFilter::Unmatched)
                }
                _ => {}
            }
        }
        query
    }

    fn matches_search(&self, title: &str) -> bool {
        match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => {
                title.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => true,
        }
    }
}

/// One row of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingEntry<'a> {
    pub record: &'a EventRecord,
    pub lifecycle: Lifecycle,
    pub join_count: usize,
    pub relationship: Relationship,
}

impl<'a> ListingEntry<'a> {
    fn new(record: &'a EventRecord, viewer: Option<UserId>, snapshot: &Snapshot) -> Self {
        Self {
            record,
            lifecycle: record.lifecycle(snapshot),
            join_count: record.join_count(),
            relationship: record.relationship(viewer),
        }
    }
}

/// Build the public events list for `viewer` (`None` when anonymous).
pub fn build_listing<'a>(
    records: &'a [EventRecord],
    viewer: Option<UserId>,
    query: &ListingQuery,
    policy: &VisibilityPolicy,
    snapshot: &Snapshot,
) -> Vec<ListingEntry<'a>> {
    let now = snapshot.now();

    let mut entries: Vec<ListingEntry<'a>> = records
        .iter()
        .filter(|record| query.matches_search(&record.event.title))
        .filter(|record| query.tag.map_or(true, |tag| record.event.has_tag(tag)))
        .map(|record| ListingEntry::new(record, viewer, snapshot))
        .filter(|entry| policy.is_visible(&entry.record.event.schedule, entry.lifecycle, now))
        .filter(|entry| query.lifecycle.matches(entry.lifecycle))
        .filter(|entry| query.role.matches(entry.relationship))
        .collect();

    sort_entries(&mut entries, query.sort);

    debug!(
        "Listing built: {} of {} events shown (sort {:?}, role {:?}, lifecycle {:?})",
        entries.len(),
        records.len(),
        query.sort,
        query.role,
        query.lifecycle
    );
    entries
}

fn sort_entries(entries: &mut [ListingEntry<'_>], order: SortOrder) {
    match order {
        SortOrder::Upcoming => entries.sort_by_key(|e| e.record.event.schedule.date),
        SortOrder::Popular => entries.sort_by(|a, b| b.join_count.cmp(&a.join_count)),
        SortOrder::Newest => entries.sort_by(|a, b| b.record.event.id.cmp(&a.record.event.id)),
    }
}

/// Filter of the viewer's own events or communities page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipFilter {
    /// Created or joined
    #[default]
    All,
    Created,
    /// Joined, excluding what the viewer created
    Joined,
}

impl OwnershipFilter {
    pub fn matches(self, relationship: Relationship) -> bool {
        match self {
            OwnershipFilter::All => relationship.is_registered(),
            OwnershipFilter::Created => relationship == Relationship::Creator,
            OwnershipFilter::Joined => relationship == Relationship::Member,
        }
    }
}

impl FromStr for OwnershipFilter {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(OwnershipFilter::All),
            "created" => Ok(OwnershipFilter::Created),
            "joined" => Ok(OwnershipFilter::Joined),
            _ => Err(ParseListingError {
                kind: "filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Events the viewer created or joined. Visibility windows do not apply.
pub fn my_events<'a>(
    records: &'a [EventRecord],
    viewer: UserId,
    filter: OwnershipFilter,
    snapshot: &Snapshot,
) -> Vec<ListingEntry<'a>> {
    records
        .iter()
        .map(|record| ListingEntry::new(record, Some(viewer), snapshot))
        .filter(|entry| filter.matches(entry.relationship))
        .collect()
}
