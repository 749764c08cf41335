//! Shared player state
//!
//! The tracks around the cursor plus everything eligible to play next:
//! album pool, playlist pool, manual queue and external files. Owned by the
//! [`Player`](crate::Player) and lent to the shuffle engine per call.

use crate::queue::Queue;
use crate::types::{NextContext, Shuffle};
use tempo_core::{Album, AlbumId, Track};

/// Pool and cursor state shared by the playback core and shuffle engine
#[derive(Debug, Clone, Default)]
pub struct Pool {
    pub(crate) current_track: Track,
    pub(crate) next_track: Track,
    pub(crate) prev_track: Track,
    pub(crate) albums: Vec<Album>,
    pub(crate) playlist_tracks: Vec<Track>,
    pub(crate) playlist_ids: Vec<i64>,
    pub(crate) queue: Queue,
    pub(crate) external_tracks: Vec<Track>,
    pub(crate) shuffle: Shuffle,
    pub(crate) next_context: NextContext,
}

impl Pool {
    /// Create an empty pool
    pub fn new(shuffle: Shuffle) -> Self {
        Self {
            shuffle,
            ..Self::default()
        }
    }

    pub fn current_track(&self) -> &Track {
        &self.current_track
    }

    pub fn next_track(&self) -> &Track {
        &self.next_track
    }

    pub fn prev_track(&self) -> &Track {
        &self.prev_track
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn playlist_tracks(&self) -> &[Track] {
        &self.playlist_tracks
    }

    pub fn playlist_ids(&self) -> &[i64] {
        &self.playlist_ids
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn external_tracks(&self) -> &[Track] {
        &self.external_tracks
    }

    pub fn shuffle(&self) -> Shuffle {
        self.shuffle
    }

    pub fn next_context(&self) -> NextContext {
        self.next_context
    }

    /// Album from the pool by id
    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|album| album.id == id)
    }

    /// True if nothing is left to continue with: no albums, no queue, no playlist
    pub fn is_drained(&self) -> bool {
        self.albums.is_empty() && self.queue.is_empty() && self.playlist_ids.is_empty()
    }

    /// Next track in pool order, ignoring queue and shuffle
    ///
    /// Walks external files, then the playlist, then albums. At the end of an
    /// album the first track of the following pool album is returned. There
    /// is no wrap-around: the last track of the pool has no successor.
    pub fn linear_next(&self) -> Track {
        let current = &self.current_track;
        if current.is_none() {
            return self
                .playlist_tracks
                .first()
                .or_else(|| self.albums.first().and_then(|a| a.tracks.first()))
                .cloned()
                .unwrap_or_default();
        }

        if let Some(index) = self.external_tracks.iter().position(|t| t == current) {
            return self.external_tracks.get(index + 1).cloned().unwrap_or_default();
        }
        if let Some(index) = self.playlist_tracks.iter().position(|t| t == current) {
            return self.playlist_tracks.get(index + 1).cloned().unwrap_or_default();
        }

        let Some(album_index) = self.current_album_index() else {
            return Track::default();
        };
        let album = &self.albums[album_index];
        album
            .tracks
            .get(current.position + 1)
            .or_else(|| {
                self.albums
                    .get(album_index + 1)
                    .and_then(|next| next.tracks.first())
            })
            .cloned()
            .unwrap_or_default()
    }

    /// Previous track in pool order, ignoring queue and shuffle
    ///
    /// Mirror of [`Pool::linear_next`]: at the start of an album the last
    /// track of the preceding pool album is returned.
    pub fn linear_prev(&self) -> Track {
        let current = &self.current_track;
        if current.is_none() {
            return Track::default();
        }

        if let Some(index) = self.external_tracks.iter().position(|t| t == current) {
            return index
                .checked_sub(1)
                .and_then(|i| self.external_tracks.get(i))
                .cloned()
                .unwrap_or_default();
        }
        if let Some(index) = self.playlist_tracks.iter().position(|t| t == current) {
            return index
                .checked_sub(1)
                .and_then(|i| self.playlist_tracks.get(i))
                .cloned()
                .unwrap_or_default();
        }

        let Some(album_index) = self.current_album_index() else {
            return Track::default();
        };
        let album = &self.albums[album_index];
        current
            .position
            .checked_sub(1)
            .and_then(|position| album.tracks.get(position))
            .or_else(|| {
                album_index
                    .checked_sub(1)
                    .and_then(|i| self.albums.get(i))
                    .and_then(|prev| prev.tracks.last())
            })
            .cloned()
            .unwrap_or_default()
    }

    fn current_album_index(&self) -> Option<usize> {
        let album_id = self.current_track.album_id?;
        self.albums.iter().position(|album| album.id == album_id)
    }
}
