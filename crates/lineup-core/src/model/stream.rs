use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ids::{SongId, StreamId, UserId};

/// A single playback event of a song.
///
/// The listener reference is optional: when a user is removed from the
/// identity subsystem the stream survives with `user_id` cleared, so
/// revenue history is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub song_id: SongId,
    pub user_id: Option<UserId>,

    /// Date the playback happened.
    pub streamed_on: NaiveDate,

    /// Seconds of playback actually delivered. Non-negative by
    /// construction; may be shorter than the song if the listener
    /// skipped ahead.
    pub duration_secs: u32,
}

impl Stream {
    #[must_use]
    pub fn new(song_id: SongId, streamed_on: NaiveDate, duration_secs: u32) -> Self {
        Self {
            id: StreamId::new(),
            song_id,
            user_id: None,
            streamed_on,
            duration_secs,
        }
    }

    #[must_use]
    pub fn by_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
