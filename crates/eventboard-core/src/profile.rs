//! Profile completion score shown on the account page.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::TagId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub favourite_tags: Vec<TagId>,
}

impl Profile {
    /// Number of scored fields.
    pub const SCORED_FIELDS: u32 = 6;

    pub const MAX_FAVOURITE_TAGS: usize = 5;

    /// Reject a profile with too many favourite interests.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.favourite_tags.len() > Self::MAX_FAVOURITE_TAGS {
            return Err(ValidationError::TooManyFavourites {
                max: Self::MAX_FAVOURITE_TAGS,
            });
        }
        Ok(())
    }

    /// Scored fields that are filled in. The address is not scored; an age
    /// of zero counts as missing.
    pub fn filled_fields(&self) -> u32 {
        [
            !self.full_name.is_empty(),
            self.age.is_some_and(|age| age > 0),
            !self.phone.is_empty(),
            !self.bio.is_empty(),
            self.picture.as_deref().is_some_and(|p| !p.is_empty()),
            !self.favourite_tags.is_empty(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count() as u32
    }

    /// Completion percentage, rounded down.
    pub fn completion_percent(&self) -> u32 {
        self.filled_fields() * 100 / Self::SCORED_FIELDS
    }
}
