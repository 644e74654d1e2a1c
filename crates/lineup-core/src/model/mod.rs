pub mod album;
pub mod artist;
pub mod band;
pub mod ids;
pub mod membership;
pub mod song;
pub mod stream;

pub use album::Album;
pub use artist::Artist;
pub use band::Band;
pub use ids::{AlbumId, ArtistId, BandId, MembershipId, SongId, StreamId, UserId};
pub use membership::Membership;
pub use song::Song;
pub use stream::Stream;
