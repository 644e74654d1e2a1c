use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{AlbumId, BandId};

/// An album released by a band.
///
/// The release date is mandatory; an unreleased record has no place in
/// the catalog. Deleting the owning band deletes the album and its songs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub band_id: BandId,
    pub name: String,

    /// Date the album was released.
    pub release: NaiveDate,
}

impl Album {
    #[must_use]
    pub fn new(band_id: BandId, name: impl Into<String>, release: NaiveDate) -> Self {
        Self {
            id: AlbumId::new(),
            band_id,
            name: name.into(),
            release,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_new() {
        let band_id = BandId::new();
        let release = NaiveDate::from_ymd_opt(1997, 6, 16).unwrap();
        let album = Album::new(band_id, "OK Computer", release);

        assert_eq!(album.band_id, band_id);
        assert_eq!(album.name, "OK Computer");
        assert_eq!(album.release, release);
    }
}
