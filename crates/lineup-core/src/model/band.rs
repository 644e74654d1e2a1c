use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::BandId;

/// A musical group.
///
/// Root of the catalog hierarchy: a band has albums, albums have songs,
/// and artists are attached through timed [`Membership`] records.
///
/// [`Membership`]: crate::model::Membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub id: BandId,
    pub name: String,
}

impl Band {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BandId::new(),
            name: name.into(),
        }
    }

    /// Check the band's invariants. Called by every catalog on insert.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("band name must be non-empty".into()));
        }
        Ok(())
    }
}
