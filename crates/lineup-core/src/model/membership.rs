use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ids::{ArtistId, BandId, MembershipId};

/// A timed record of an artist belonging to a band.
///
/// `joined` is the first day of membership (inclusive). `left`, when set,
/// is the first day the artist is no longer a member (exclusive); when
/// unset the membership is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub band_id: BandId,
    pub artist_id: ArtistId,
    pub joined: NaiveDate,
    pub left: Option<NaiveDate>,
}

impl Membership {
    #[must_use]
    pub fn new(band_id: BandId, artist_id: ArtistId, joined: NaiveDate) -> Self {
        Self {
            id: MembershipId::new(),
            band_id,
            artist_id,
            joined,
            left: None,
        }
    }

    /// Close the membership on the given date.
    #[must_use]
    pub fn until(mut self, left: NaiveDate) -> Self {
        self.left = Some(left);
        self
    }

    /// Check the membership's invariants. Called by every catalog on insert.
    pub fn validate(&self) -> Result<()> {
        if let Some(left) = self.left {
            if left <= self.joined {
                return Err(Error::InvalidData(format!(
                    "membership left date {left} must be after joined date {}",
                    self.joined
                )));
            }
        }
        Ok(())
    }

    /// Was the artist a member of the band on `date`?
    ///
    /// The join date counts; the leave date does not. An open-ended
    /// membership is active for every date on or after `joined`.
    #[must_use]
    pub fn active_on(&self, date: NaiveDate) -> bool {
        self.joined <= date && self.left.is_none_or(|left| left > date)
    }
}
