//! Communities and their member lists.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use crate::clock::Snapshot;
use crate::error::{CoreError, ValidationError};
use crate::event::{Denial, JoinOutcome, Relationship, Roster, TagId, UserId};
use crate::listing::{OwnershipFilter, ParseListingError, RoleFilter};

/// Limits enforced on submitted communities.
pub mod constraints {
    pub const NAME_MAX: usize = 100;
    pub const MAX_TAGS: usize = 3;
}

/// Community identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rules")]
    pub rules: String,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub members: Roster,
}

fn default_rules() -> String {
    "Be respectful to all members.".to_string()
}

/// Fields a creator fills in when creating or editing a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rules")]
    pub rules: String,
    #[serde(default)]
    pub tags: Vec<TagId>,
}

impl CommunityDraft {
    /// Check every form rule.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("rules", &self.rules),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Empty { field });
            }
        }

        let len = self.name.chars().count();
        if len > constraints::NAME_MAX {
            return Err(ValidationError::TooLong {
                field: "name",
                max: constraints::NAME_MAX,
                len,
            });
        }

        if self.tags.len() > constraints::MAX_TAGS {
            return Err(ValidationError::TooManyCommunityTags {
                max: constraints::MAX_TAGS,
            });
        }
        Ok(())
    }
}

impl Community {
    /// Create a community; the creator becomes its first member.
    pub fn create(
        id: CommunityId,
        draft: &CommunityDraft,
        creator: UserId,
        snapshot: &Snapshot,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        let mut members = Roster::new();
        members.join(creator);
        info!("Created community {} by user {}", id.0, creator);
        Ok(Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            rules: draft.rules.clone(),
            created_by: creator,
            created_at: snapshot.now(),
            tags: draft.tags.clone(),
            members,
        })
    }

    /// Apply an edit. Only the creator may edit.
    pub fn edit(&mut self, user: UserId, draft: &CommunityDraft) -> Result<(), CoreError> {
        if user != self.created_by {
            debug!("Denied edit on community {} for user {}", self.id.0, user);
            return Err(Denial::NotCommunityCreator.into());
        }
        draft.validate()?;
        self.name = draft.name.clone();
        self.description = draft.description.clone();
        self.rules = draft.rules.clone();
        self.tags = draft.tags.clone();
        info!("Community {} edited by user {}", self.id.0, user);
        Ok(())
    }

    pub fn relationship(&self, viewer: Option<UserId>) -> Relationship {
        match viewer {
            Some(user) if user == self.created_by => Relationship::Creator,
            Some(user) if self.members.contains(user) => Relationship::Member,
            _ => Relationship::Outsider,
        }
    }

    /// Join without duplicates. Communities have no capacity.
    pub fn join(&mut self, user: UserId) -> JoinOutcome {
        let outcome = self.members.join(user);
        if outcome == JoinOutcome::Joined {
            info!("User {} joined community {}", user, self.id.0);
        }
        outcome
    }

    pub fn leave(&mut self, user: UserId) -> bool {
        let left = self.members.leave(user);
        if left {
            info!("User {} left community {}", user, self.id.0);
        }
        left
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunitySort {
    /// Most recently created first
    #[default]
    Newest,
    /// Most members first
    Popular,
}

impl FromStr for CommunitySort {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(CommunitySort::Newest),
            "popular" => Ok(CommunitySort::Popular),
            _ => Err(ParseListingError {
                kind: "sort",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityQuery {
    /// Case-insensitive name substring
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub tag: Option<TagId>,
    #[serde(default)]
    pub role: RoleFilter,
    #[serde(default)]
    pub sort: CommunitySort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityEntry<'a> {
    pub community: &'a Community,
    pub member_count: usize,
    pub relationship: Relationship,
}

/// Build the community list for `viewer`. The role filter only applies to
/// signed-in viewers.
pub fn list_communities<'a>(
    communities: &'a [Community],
    viewer: Option<UserId>,
    query: &CommunityQuery,
) -> Vec<CommunityEntry<'a>> {
    let needle = query
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut entries: Vec<CommunityEntry<'a>> = communities
        .iter()
        .filter(|c| {
            needle
                .as_deref()
                .map_or(true, |n| c.name.to_lowercase().contains(n))
        })
        .filter(|c| query.tag.map_or(true, |tag| c.tags.contains(&tag)))
        .map(|community| CommunityEntry {
            community,
            member_count: community.member_count(),
            relationship: community.relationship(viewer),
        })
        .filter(|entry| viewer.is_none() || query.role.matches(entry.relationship))
        .collect();

    match query.sort {
        CommunitySort::Newest => {
            entries.sort_by(|a, b| b.community.created_at.cmp(&a.community.created_at))
        }
        CommunitySort::Popular => entries.sort_by(|a, b| b.member_count.cmp(&a.member_count)),
    }
    entries
}

/// Communities the viewer created or joined.
pub fn my_communities(
    communities: &[Community],
    viewer: UserId,
    filter: OwnershipFilter,
) -> Vec<CommunityEntry<'_>> {
    communities
        .iter()
        .map(|community| CommunityEntry {
            community,
            member_count: community.member_count(),
            relationship: community.relationship(Some(viewer)),
        })
        .filter(|entry| filter.matches(entry.relationship))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn community(id: u64, name: &str, day: u32, creator: u64, members: &[u64]) -> Community {
        Community {
            id: CommunityId(id),
            name: name.to_string(),
            description: String::new(),
            rules: default_rules(),
            created_by: UserId(creator),
            created_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            tags: vec![TagId(1)],
            members: members.iter().copied().map(UserId).collect(),
        }
    }

    fn draft(name: &str, tags: &[u64]) -> CommunityDraft {
        CommunityDraft {
            name: name.to_string(),
            description: "Weekend walks".to_string(),
            rules: default_rules(),
            tags: tags.iter().copied().map(TagId).collect(),
        }
    }

    fn noon() -> Snapshot {
        Snapshot::at(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn create_registers_creator() {
        let c = Community::create(CommunityId(1), &draft("Hikers", &[1]), UserId(7), &noon())
            .unwrap();
        assert_eq!(c.member_count(), 1);
        assert!(c.members.contains(UserId(7)));
        assert_eq!(c.relationship(Some(UserId(7))), Relationship::Creator);
        assert_eq!(c.created_at, noon().now());
    }

    #[test]
    fn at_most_three_tags() {
        assert_eq!(draft("Hikers", &[1, 2, 3]).validate(), Ok(()));
        let err = draft("Hikers", &[1, 2, 3, 4]).validate().unwrap_err();
        assert_eq!(err, ValidationError::TooManyCommunityTags { max: 3 });
        assert_eq!(err.to_string(), "You can select a maximum of 3 tags.");
    }

    #[test]
    fn draft_requires_name_and_defaults_rules() {
        assert_eq!(
            draft(" ", &[]).validate(),
            Err(ValidationError::Empty { field: "name" })
        );
        let parsed: CommunityDraft = serde_json::from_value(serde_json::json!({
            "name": "Readers",
            "description": "Monthly book club",
        }))
        .unwrap();
        assert_eq!(parsed.rules, "Be respectful to all members.");
        assert_eq!(parsed.validate(), Ok(()));
    }

    #[test]
    fn only_creator_may_edit() {
        let mut c = Community::create(CommunityId(1), &draft("Hikers", &[]), UserId(7), &noon())
            .unwrap();
        c.join(UserId(8));

        let err = c.edit(UserId(8), &draft("Taken over", &[])).unwrap_err();
        assert!(matches!(err, CoreError::Denied(Denial::NotCommunityCreator)));
        assert_eq!(c.name, "Hikers");

        c.edit(UserId(7), &draft("Night hikers", &[2])).unwrap();
        assert_eq!(c.name, "Night hikers");
        assert_eq!(c.tags, vec![TagId(2)]);

        let err = c.edit(UserId(7), &draft("Night hikers", &[1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn join_twice_keeps_one_membership() {
        let mut c = community(1, "Hikers", 1, 1, &[]);
        assert_eq!(c.join(UserId(2)), JoinOutcome::Joined);
        assert_eq!(c.join(UserId(2)), JoinOutcome::AlreadyJoined);
        assert_eq!(c.member_count(), 1);
        assert!(c.leave(UserId(2)));
        assert!(!c.leave(UserId(2)));
    }

    #[test]
    fn newest_and_popular_ordering() {
        let communities = vec![
            community(1, "Hikers", 1, 1, &[2, 3, 4]),
            community(2, "Readers", 5, 1, &[2]),
        ];
        let newest = list_communities(&communities, None, &CommunityQuery::default());
        assert_eq!(newest[0].community.id, CommunityId(2));

        let popular = list_communities(
            &communities,
            None,
            &CommunityQuery {
                sort: CommunitySort::Popular,
                ..Default::default()
            },
        );
        assert_eq!(popular[0].community.id, CommunityId(1));
    }

    #[test]
    fn role_and_search_filters() {
        let communities = vec![
            community(1, "Hikers", 1, 9, &[]),
            community(2, "Night hikers", 2, 1, &[9]),
            community(3, "Readers", 3, 1, &[]),
        ];
        let query = CommunityQuery {
            search: Some("HIKER".to_string()),
            role: RoleFilter::Joined,
            ..Default::default()
        };
        let entries = list_communities(&communities, Some(UserId(9)), &query);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].community.id, CommunityId(2));
        assert_eq!(entries[0].relationship, Relationship::Member);
    }

    #[test]
    fn anonymous_viewer_ignores_role_filter() {
        let communities = vec![community(1, "Hikers", 1, 9, &[])];
        for role in [RoleFilter::Created, RoleFilter::Joined, RoleFilter::NotJoined] {
            let query = CommunityQuery {
                role,
                ..Default::default()
            };
            assert_eq!(list_communities(&communities, None, &query).len(), 1, "{role:?}");
        }
        let created = CommunityQuery {
            role: RoleFilter::Created,
            ..Default::default()
        };
        assert!(list_communities(&communities, Some(UserId(2)), &created).is_empty());
    }

    #[test]
    fn my_communities_filters() {
        let communities = vec![
            community(1, "Hikers", 1, 9, &[9]),
            community(2, "Readers", 2, 1, &[9]),
            community(3, "Chess", 3, 1, &[]),
        ];
        let ids = |filter| -> Vec<u64> {
            my_communities(&communities, UserId(9), filter)
                .iter()
                .map(|e| e.community.id.0)
                .collect()
        };
        assert_eq!(ids(OwnershipFilter::All), vec![1, 2]);
        assert_eq!(ids(OwnershipFilter::Created), vec![1]);
        assert_eq!(ids(OwnershipFilter::Joined), vec![2]);
    }
}
