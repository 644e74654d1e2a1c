//! SQLite binding for the lineup [`Catalog`] trait.
//!
//! Referential integrity lives in the schema: album→band, song→album,
//! stream→song, and membership→band/artist are `ON DELETE CASCADE`;
//! stream→user is `ON DELETE SET NULL`. The entity invariants are
//! checked in Rust before insert and mirrored as SQL `CHECK`s.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod migrations;

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use lineup_core::model::{
    Album, AlbumId, Artist, ArtistId, Band, BandId, Membership, MembershipId, Song, SongId, Stream,
    StreamId, UserId,
};
use lineup_core::storage::Catalog;
use lineup_core::{Error, Result};

use migrations::MIGRATIONS;

/// A [`Catalog`] stored in a SQLite database.
#[derive(Debug)]
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_conn(Connection::open(path).map_err(db_err)?)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_conn(Connection::open_in_memory().map_err(db_err)?)
    }

    fn from_conn(conn: Connection) -> Result<Self> {
        // The pragma is connection-scoped, so it runs on every open
        // rather than living in the migration SQL.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(db_err)?;
        let catalog = Self { conn };
        catalog.apply_migrations()?;
        Ok(catalog)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
                )",
                [],
            )
            .map_err(db_err)?;

        let applied: Vec<u32> = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")
            .and_then(|mut stmt| {
                stmt.query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(db_err)?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql).map_err(db_err)?;
                self.conn
                    .execute(
                        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                        rusqlite::params![migration.version, migration.name],
                    )
                    .map_err(db_err)?;
            }
        }

        Ok(())
    }
}

fn db_err(err: rusqlite::Error) -> Error {
    Error::Storage(err.to_string())
}

fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_duration(idx: usize, value: i64) -> rusqlite::Result<u32> {
    u32::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

fn row_to_band(row: &Row) -> rusqlite::Result<Band> {
    Ok(Band {
        id: BandId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        name: row.get(1)?,
    })
}

fn row_to_album(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: AlbumId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        band_id: BandId::from_uuid(parse_uuid(1, &row.get::<_, String>(1)?)?),
        name: row.get(2)?,
        release: parse_date(3, &row.get::<_, String>(3)?)?,
    })
}

fn row_to_song(row: &Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: SongId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        album_id: AlbumId::from_uuid(parse_uuid(1, &row.get::<_, String>(1)?)?),
        name: row.get(2)?,
        duration_secs: parse_duration(3, row.get(3)?)?,
    })
}

fn row_to_artist(row: &Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: ArtistId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        name: row.get(1)?,
    })
}

fn row_to_membership(row: &Row) -> rusqlite::Result<Membership> {
    let left: Option<String> = row.get(4)?;
    Ok(Membership {
        id: MembershipId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        band_id: BandId::from_uuid(parse_uuid(1, &row.get::<_, String>(1)?)?),
        artist_id: ArtistId::from_uuid(parse_uuid(2, &row.get::<_, String>(2)?)?),
        joined: parse_date(3, &row.get::<_, String>(3)?)?,
        left: left.as_deref().map(|s| parse_date(4, s)).transpose()?,
    })
}

fn row_to_stream(row: &Row) -> rusqlite::Result<Stream> {
    let user_id: Option<String> = row.get(2)?;
    Ok(Stream {
        id: StreamId::from_uuid(parse_uuid(0, &row.get::<_, String>(0)?)?),
        song_id: SongId::from_uuid(parse_uuid(1, &row.get::<_, String>(1)?)?),
        user_id: user_id
            .as_deref()
            .map(|s| parse_uuid(2, s).map(UserId::from_uuid))
            .transpose()?,
        streamed_on: parse_date(3, &row.get::<_, String>(3)?)?,
        duration_secs: parse_duration(4, row.get(4)?)?,
    })
}

impl Catalog for SqliteCatalog {
    fn insert_band(&self, band: &Band) -> Result<()> {
        band.validate()?;
        self.conn
            .execute(
                "INSERT INTO bands (id, name) VALUES (?1, ?2)",
                rusqlite::params![band.id.to_string(), band.name],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn insert_album(&self, album: &Album) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO albums (id, band_id, name, release) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    album.id.to_string(),
                    album.band_id.to_string(),
                    album.name,
                    album.release.to_string(),
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn insert_song(&self, song: &Song) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO songs (id, album_id, name, duration_secs) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    song.id.to_string(),
                    song.album_id.to_string(),
                    song.name,
                    i64::from(song.duration_secs),
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn insert_artist(&self, artist: &Artist) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO artists (id, name) VALUES (?1, ?2)",
                rusqlite::params![artist.id.to_string(), artist.name],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn insert_membership(&self, membership: &Membership) -> Result<()> {
        membership.validate()?;
        self.conn
            .execute(
                r#"INSERT INTO memberships (id, band_id, artist_id, joined, "left")
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                rusqlite::params![
                    membership.id.to_string(),
                    membership.band_id.to_string(),
                    membership.artist_id.to_string(),
                    membership.joined.to_string(),
                    membership.left.map(|d| d.to_string()),
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn insert_stream(&self, stream: &Stream) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO streams (id, song_id, user_id, streamed_on, duration_secs)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    stream.id.to_string(),
                    stream.song_id.to_string(),
                    stream.user_id.map(|id| id.to_string()),
                    stream.streamed_on.to_string(),
                    i64::from(stream.duration_secs),
                ],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn get_band(&self, id: BandId) -> Result<Option<Band>> {
        self.conn
            .query_row(
                "SELECT id, name FROM bands WHERE id = ?1",
                [id.to_string()],
                row_to_band,
            )
            .optional()
            .map_err(db_err)
    }

    fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        self.conn
            .query_row(
                "SELECT id, band_id, name, release FROM albums WHERE id = ?1",
                [id.to_string()],
                row_to_album,
            )
            .optional()
            .map_err(db_err)
    }

    fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        self.conn
            .query_row(
                "SELECT id, album_id, name, duration_secs FROM songs WHERE id = ?1",
                [id.to_string()],
                row_to_song,
            )
            .optional()
            .map_err(db_err)
    }

    fn get_artist(&self, id: ArtistId) -> Result<Option<Artist>> {
        self.conn
            .query_row(
                "SELECT id, name FROM artists WHERE id = ?1",
                [id.to_string()],
                row_to_artist,
            )
            .optional()
            .map_err(db_err)
    }

    fn list_albums_for_band(&self, band_id: BandId) -> Result<Vec<Album>> {
        self.conn
            .prepare(
                "SELECT id, band_id, name, release FROM albums
                 WHERE band_id = ?1 ORDER BY release",
            )
            .and_then(|mut stmt| {
                stmt.query_map([band_id.to_string()], row_to_album)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(db_err)
    }

    fn list_songs_for_album(&self, album_id: AlbumId) -> Result<Vec<Song>> {
        self.conn
            .prepare(
                "SELECT id, album_id, name, duration_secs FROM songs
                 WHERE album_id = ?1 ORDER BY name",
            )
            .and_then(|mut stmt| {
                stmt.query_map([album_id.to_string()], row_to_song)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(db_err)
    }

    fn list_memberships_for_band(&self, band_id: BandId) -> Result<Vec<Membership>> {
        self.conn
            .prepare(
                r#"SELECT id, band_id, artist_id, joined, "left" FROM memberships
                   WHERE band_id = ?1 ORDER BY joined"#,
            )
            .and_then(|mut stmt| {
                stmt.query_map([band_id.to_string()], row_to_membership)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(db_err)
    }

    fn list_streams_for_song(&self, song_id: SongId) -> Result<Vec<Stream>> {
        self.conn
            .prepare(
                "SELECT id, song_id, user_id, streamed_on, duration_secs FROM streams
                 WHERE song_id = ?1 ORDER BY streamed_on, id",
            )
            .and_then(|mut stmt| {
                stmt.query_map([song_id.to_string()], row_to_stream)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(db_err)
    }

    fn insert_user(&self, id: UserId) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO users (id) VALUES (?1)",
                [id.to_string()],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<()> {
        // streams.user_id is ON DELETE SET NULL
        self.conn
            .execute("DELETE FROM users WHERE id = ?1", [id.to_string()])
            .map_err(db_err)?;
        Ok(())
    }

    fn delete_band(&self, id: BandId) -> Result<()> {
        // Cascades through albums, songs, streams, and memberships.
        self.conn
            .execute("DELETE FROM bands WHERE id = ?1", [id.to_string()])
            .map_err(db_err)?;
        Ok(())
    }

    fn delete_artist(&self, id: ArtistId) -> Result<()> {
        self.conn
            .execute("DELETE FROM artists WHERE id = ?1", [id.to_string()])
            .map_err(db_err)?;
        Ok(())
    }
}
