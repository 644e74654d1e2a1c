use serde::{Deserialize, Serialize};

use crate::model::ids::ArtistId;

/// A musician. Attached to bands through [`Membership`] records, so an
/// artist can belong to several bands, or to the same band over several
/// disjoint intervals.
///
/// [`Membership`]: crate::model::Membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

impl Artist {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ArtistId::new(),
            name: name.into(),
        }
    }
}
