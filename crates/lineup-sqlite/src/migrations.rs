/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Bands
CREATE TABLE IF NOT EXISTS bands (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0)
);

-- Albums (owned by a band)
CREATE TABLE IF NOT EXISTS albums (
    id TEXT PRIMARY KEY,
    band_id TEXT NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    release TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_albums_band_id ON albums(band_id);

-- Songs (owned by an album)
CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    album_id TEXT NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    duration_secs INTEGER NOT NULL CHECK (duration_secs >= 0)
);

CREATE INDEX IF NOT EXISTS idx_songs_album_id ON songs(album_id);

-- Artists
CREATE TABLE IF NOT EXISTS artists (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- Band memberships (many-to-many with temporal extent)
CREATE TABLE IF NOT EXISTS memberships (
    id TEXT PRIMARY KEY,
    band_id TEXT NOT NULL REFERENCES bands(id) ON DELETE CASCADE,
    artist_id TEXT NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
    joined TEXT NOT NULL,
    -- "left" needs quoting: it is a join keyword in SQLite
    "left" TEXT CHECK ("left" IS NULL OR "left" > joined)
);

CREATE INDEX IF NOT EXISTS idx_memberships_band_id ON memberships(band_id);
CREATE INDEX IF NOT EXISTS idx_memberships_artist_id ON memberships(artist_id);

-- Mirrored identity ids; attributes live in the identity subsystem
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY
);

-- Stream events (owned by a song; outlive their listener)
CREATE TABLE IF NOT EXISTS streams (
    id TEXT PRIMARY KEY,
    song_id TEXT NOT NULL REFERENCES songs(id) ON DELETE CASCADE,
    user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
    streamed_on TEXT NOT NULL,
    duration_secs INTEGER NOT NULL CHECK (duration_secs >= 0)
);

CREATE INDEX IF NOT EXISTS idx_streams_song_id ON streams(song_id);
CREATE INDEX IF NOT EXISTS idx_streams_user_id ON streams(user_id);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
