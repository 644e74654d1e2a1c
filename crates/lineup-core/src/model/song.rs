use serde::{Deserialize, Serialize};

use crate::model::ids::{AlbumId, SongId};

/// A song on an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub album_id: AlbumId,
    pub name: String,

    /// Track length in seconds. Non-negative by construction.
    pub duration_secs: u32,
}

impl Song {
    #[must_use]
    pub fn new(album_id: AlbumId, name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            id: SongId::new(),
            album_id,
            name: name.into(),
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_new() {
        let album_id = AlbumId::new();
        let song = Song::new(album_id, "Intro", 214);

        assert_eq!(song.album_id, album_id);
        assert_eq!(song.name, "Intro");
        assert_eq!(song.duration_secs, 214);
    }
}
