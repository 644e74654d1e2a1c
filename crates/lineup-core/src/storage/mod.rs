//! The storage seam between the domain model and whatever persists it.
//!
//! [`Catalog`] is the only interface the derived queries know about.
//! [`memory::MemoryCatalog`] implements it over plain maps;
//! `lineup-sqlite` implements it over SQLite. Both must honor the same
//! referential-integrity contract, spelled out on the trait below.

pub mod memory;

pub use memory::MemoryCatalog;

use crate::error::Result;
use crate::model::{
    Album, AlbumId, Artist, ArtistId, Band, BandId, Membership, Song, SongId, Stream, UserId,
};

/// Typed persistence for the lineup entity model.
///
/// # Referential integrity contract
///
/// Every implementation must enforce:
///
/// - inserts validate entity invariants ([`Band::validate`],
///   [`Membership::validate`]) and require referenced rows to exist;
/// - ids are primary keys: inserting an entity whose id is already
///   present is an error, never a silent overwrite;
/// - [`delete_band`](Catalog::delete_band) cascades to the band's
///   albums, their songs, and those songs' streams, and removes the
///   band's memberships;
/// - [`delete_artist`](Catalog::delete_artist) cascades to the artist's
///   memberships;
/// - [`delete_user`](Catalog::delete_user) clears `user_id` on streams
///   that referenced the user; the streams themselves persist.
///
/// List operations return results in unspecified order; callers that
/// need determinism sort for themselves. Reads are expected to be
/// consistent within a single call, nothing more.
pub trait Catalog {
    fn insert_band(&self, band: &Band) -> Result<()>;
    fn insert_album(&self, album: &Album) -> Result<()>;
    fn insert_song(&self, song: &Song) -> Result<()>;
    fn insert_artist(&self, artist: &Artist) -> Result<()>;
    fn insert_membership(&self, membership: &Membership) -> Result<()>;
    fn insert_stream(&self, stream: &Stream) -> Result<()>;

    fn get_band(&self, id: BandId) -> Result<Option<Band>>;
    fn get_album(&self, id: AlbumId) -> Result<Option<Album>>;
    fn get_song(&self, id: SongId) -> Result<Option<Song>>;
    fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>>;

    fn list_albums_for_band(&self, band_id: BandId) -> Result<Vec<Album>>;
    fn list_songs_for_album(&self, album_id: AlbumId) -> Result<Vec<Song>>;
    fn list_memberships_for_band(&self, band_id: BandId) -> Result<Vec<Membership>>;
    fn list_streams_for_song(&self, song_id: SongId) -> Result<Vec<Stream>>;

    /// Mirror a user from the external identity subsystem. Only the id
    /// is stored; identity attributes stay out of the catalog.
    fn insert_user(&self, id: UserId) -> Result<()>;

    /// Remove a mirrored user, clearing `user_id` on their streams.
    fn delete_user(&self, id: UserId) -> Result<()>;

    /// Delete a band and everything it owns (albums, songs, streams,
    /// memberships). Deleting an unknown band is a no-op.
    fn delete_band(&self, id: BandId) -> Result<()>;

    /// Delete an artist and their membership records. Deleting an
    /// unknown artist is a no-op.
    fn delete_artist(&self, id: ArtistId) -> Result<()>;
}
