use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::model::{
    Album, AlbumId, Artist, ArtistId, Band, BandId, Membership, MembershipId, Song, SongId, Stream,
    StreamId, UserId,
};
use crate::storage::Catalog;

/// A [`Catalog`] backed by plain maps.
///
/// Enforces the same referential-integrity rules as the SQLite backend,
/// just by hand instead of by foreign keys. Useful as the unit-test
/// double and for anything that doesn't want a database file.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    bands: HashMap<BandId, Band>,
    albums: HashMap<AlbumId, Album>,
    songs: HashMap<SongId, Song>,
    artists: HashMap<ArtistId, Artist>,
    memberships: HashMap<MembershipId, Membership>,
    streams: HashMap<StreamId, Stream>,
    users: HashSet<UserId>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| Error::Storage("catalog lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| Error::Storage("catalog lock poisoned".into()))
    }
}

fn missing(entity: &'static str, id: impl ToString) -> Error {
    Error::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn duplicate(entity: &'static str, id: impl ToString) -> Error {
    Error::Storage(format!("duplicate {entity} id {}", id.to_string()))
}

impl Catalog for MemoryCatalog {
    fn insert_band(&self, band: &Band) -> Result<()> {
        band.validate()?;
        let mut inner = self.write()?;
        if inner.bands.contains_key(&band.id) {
            return Err(duplicate("band", band.id));
        }
        inner.bands.insert(band.id, band.clone());
        Ok(())
    }

    fn insert_album(&self, album: &Album) -> Result<()> {
        let mut inner = self.write()?;
        if inner.albums.contains_key(&album.id) {
            return Err(duplicate("album", album.id));
        }
        if !inner.bands.contains_key(&album.band_id) {
            return Err(missing("band", album.band_id));
        }
        inner.albums.insert(album.id, album.clone());
        Ok(())
    }

    fn insert_song(&self, song: &Song) -> Result<()> {
        let mut inner = self.write()?;
        if inner.songs.contains_key(&song.id) {
            return Err(duplicate("song", song.id));
        }
        if !inner.albums.contains_key(&song.album_id) {
            return Err(missing("album", song.album_id));
        }
        inner.songs.insert(song.id, song.clone());
        Ok(())
    }

    fn insert_artist(&self, artist: &Artist) -> Result<()> {
        let mut inner = self.write()?;
        if inner.artists.contains_key(&artist.id) {
            return Err(duplicate("artist", artist.id));
        }
        inner.artists.insert(artist.id, artist.clone());
        Ok(())
    }

    fn insert_membership(&self, membership: &Membership) -> Result<()> {
        membership.validate()?;
        let mut inner = self.write()?;
        if inner.memberships.contains_key(&membership.id) {
            return Err(duplicate("membership", membership.id));
        }
        if !inner.bands.contains_key(&membership.band_id) {
            return Err(missing("band", membership.band_id));
        }
        if !inner.artists.contains_key(&membership.artist_id) {
            return Err(missing("artist", membership.artist_id));
        }
        inner.memberships.insert(membership.id, membership.clone());
        Ok(())
    }

    fn insert_stream(&self, stream: &Stream) -> Result<()> {
        let mut inner = self.write()?;
        if inner.streams.contains_key(&stream.id) {
            return Err(duplicate("stream", stream.id));
        }
        if !inner.songs.contains_key(&stream.song_id) {
            return Err(missing("song", stream.song_id));
        }
        if let Some(user_id) = stream.user_id {
            if !inner.users.contains(&user_id) {
                return Err(missing("user", user_id));
            }
        }
        inner.streams.insert(stream.id, stream.clone());
        Ok(())
    }

    fn get_band(&self, id: BandId) -> Result<Option<Band>> {
        Ok(self.read()?.bands.get(&id).cloned())
    }

    fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        Ok(self.read()?.albums.get(&id).cloned())
    }

    fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        Ok(self.read()?.songs.get(&id).cloned())
    }

    fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>> {
        Ok(self.read()?.artists.get(&id).cloned())
    }

    fn list_albums_for_band(&self, band_id: BandId) -> Result<Vec<Album>> {
        Ok(self
            .read()?
            .albums
            .values()
            .filter(|a| a.band_id == band_id)
            .cloned()
            .collect())
    }

    fn list_songs_for_album(&self, album_id: AlbumId) -> Result<Vec<Song>> {
        Ok(self
            .read()?
            .songs
            .values()
            .filter(|s| s.album_id == album_id)
            .cloned()
            .collect())
    }

    fn list_memberships_for_band(&self, band_id: BandId) -> Result<Vec<Membership>> {
        Ok(self
            .read()?
            .memberships
            .values()
            .filter(|m| m.band_id == band_id)
            .cloned()
            .collect())
    }

    fn list_streams_for_song(&self, song_id: SongId) -> Result<Vec<Stream>> {
        Ok(self
            .read()?
            .streams
            .values()
            .filter(|s| s.song_id == song_id)
            .cloned()
            .collect())
    }

    fn insert_user(&self, id: UserId) -> Result<()> {
        self.write()?.users.insert(id);
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<()> {
        let mut inner = self.write()?;
        inner.users.remove(&id);
        for stream in inner.streams.values_mut() {
            if stream.user_id == Some(id) {
                stream.user_id = None;
            }
        }
        Ok(())
    }

    fn delete_band(&self, id: BandId) -> Result<()> {
        let mut inner = self.write()?;
        if inner.bands.remove(&id).is_none() {
            return Ok(());
        }

        let album_ids: HashSet<AlbumId> = inner
            .albums
            .values()
            .filter(|a| a.band_id == id)
            .map(|a| a.id)
            .collect();
        let song_ids: HashSet<SongId> = inner
            .songs
            .values()
            .filter(|s| album_ids.contains(&s.album_id))
            .map(|s| s.id)
            .collect();

        inner.albums.retain(|album_id, _| !album_ids.contains(album_id));
        inner.songs.retain(|song_id, _| !song_ids.contains(song_id));
        inner.streams.retain(|_, s| !song_ids.contains(&s.song_id));
        inner.memberships.retain(|_, m| m.band_id != id);
        Ok(())
    }

    fn delete_artist(&self, id: ArtistId) -> Result<()> {
        let mut inner = self.write()?;
        if inner.artists.remove(&id).is_none() {
            return Ok(());
        }
        inner.memberships.retain(|_, m| m.artist_id != id);
        Ok(())
    }
}
