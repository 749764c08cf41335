/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::{Album, AlbumId, GenreId, Track, TrackId};

/// Track and album store
///
/// The player only reads catalogue data and bumps counters; storage,
/// scanning and tag reading live behind this trait. All calls happen on the
/// player's event loop thread, so implementations need no internal locking
/// beyond what their own backend requires.
pub trait Library {
    /// Resolve a track by id
    ///
    /// # Errors
    /// Returns an error if the track does not exist or storage fails
    fn track(&self, id: TrackId) -> Result<Track>;

    /// Resolve an album, tracks included, by id
    ///
    /// # Errors
    /// Returns an error if the album does not exist or storage fails
    fn album(&self, id: AlbumId) -> Result<Album>;

    /// Ids of every album in the library
    fn album_ids(&self) -> Result<Vec<AlbumId>>;

    /// Ids of albums matching the party genre filter
    fn party_album_ids(&self, genre_ids: &[GenreId]) -> Result<Vec<AlbumId>>;

    /// Ids of every known genre
    fn genre_ids(&self) -> Result<Vec<GenreId>>;

    /// Ids of the tracks in the playlist `playlist_id`
    fn playlist_track_ids(&self, playlist_id: i64) -> Result<Vec<TrackId>>;

    /// Number of tracks in an album
    fn album_track_count(&self, id: AlbumId) -> Result<usize>;

    /// Highest album popularity in the library
    fn max_popularity(&self) -> Result<u32>;

    /// Add one play to a track
    fn increment_track_popularity(&self, id: TrackId) -> Result<()>;

    /// Add `amount` to an album's aggregate popularity
    fn increment_album_popularity(&self, id: AlbumId, amount: u32) -> Result<()>;

    /// Record when a track was last heard (unix seconds)
    fn set_listened_at(&self, id: TrackId, timestamp: i64) -> Result<()>;

    /// True while a rescan holds the library; writes should be skipped
    fn is_locked(&self) -> bool {
        false
    }
}

/// Listening history service (Last.fm, ListenBrainz, ...)
pub trait Scrobbler {
    /// Whether the service is configured and reachable
    fn is_available(&self) -> bool;

    /// Announce the track that just started
    fn playing_now(&self, track: &Track);

    /// Submit a finished listen
    ///
    /// `started_at` is the unix timestamp of the moment playback began.
    fn listen(&self, track: &Track, started_at: i64);
}
