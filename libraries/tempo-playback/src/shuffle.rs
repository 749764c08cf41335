//! Shuffle and party track selection
//!
//! Decides the next/previous track when shuffle or party mode is on, keeps
//! the navigation [`History`] and the already-played bookkeeping that stops
//! a session from repeating itself.

use crate::history::History;
use crate::pool::Pool;
use crate::types::{NextContext, Shuffle};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::{HashMap, HashSet};
use tempo_core::{ids, Album, AlbumId, Library, Track, TrackId};
use tracing::{debug, info, warn};

/// Selection passes before giving up: one normal pass, one after a reset
const MAX_SELECTION_PASSES: usize = 2;

/// Shuffle/party engine
#[derive(Debug, Default)]
pub struct ShuffleEngine {
    party: bool,
    history: History,
    /// Tracks served this session, per album
    played_tracks: HashMap<Option<AlbumId>, HashSet<TrackId>>,
    /// Albums with nothing left to serve
    exhausted_albums: HashSet<Option<AlbumId>>,
}

impl ShuffleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if party mode is on
    pub fn is_party(&self) -> bool {
        self.party
    }

    /// True if this engine, rather than linear order, picks the next track
    pub fn is_active(&self, pool: &Pool) -> bool {
        pool.shuffle != Shuffle::None || self.party
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// True if history provides a next track
    pub fn has_next(&self) -> bool {
        self.history.has_next()
    }

    /// True if history provides a previous track
    pub fn has_prev(&self) -> bool {
        self.history.has_prev()
    }

    /// True if `track` was already served this session
    pub fn is_played(&self, track: &Track) -> bool {
        track.id.is_some_and(|id| {
            self.played_tracks
                .get(&track.album_id)
                .is_some_and(|played| played.contains(&id))
        })
    }

    /// Next shuffle track
    ///
    /// Replays the history forward neighbor when there is one, otherwise
    /// picks a fresh track from the pool. Returns the empty track when
    /// shuffle and party are both off, or when the pool has nothing left
    /// (in which case `pool.next_context` is set to [`NextContext::Stop`]
    /// for track-level shuffles).
    ///
    /// The history cursor is not moved here; it follows the track that
    /// actually starts, see [`ShuffleEngine::on_stream_start`].
    pub fn next(&mut self, pool: &mut Pool, library: &dyn Library) -> Track {
        if !self.is_active(pool) {
            return Track::default();
        }
        if let Some(track) = self.history.peek_next() {
            return track.clone();
        }
        if !pool.albums.is_empty()
            || (!pool.playlist_tracks.is_empty() && pool.shuffle == Shuffle::Tracks)
        {
            return self.fresh_candidate(pool, library);
        }
        Track::default()
    }

    /// Previous track based on history
    ///
    /// Without a backward neighbor the current track is returned: there is
    /// nothing before the beginning.
    pub fn prev(&self, pool: &Pool) -> Track {
        if !self.is_active(pool) {
            return Track::default();
        }
        self.history
            .peek_prev()
            .cloned()
            .unwrap_or_else(|| pool.current_track.clone())
    }

    /// Random never-played track from the album pool, for party start
    pub fn random_track(&mut self, pool: &Pool) -> Track {
        self.tracks_random(pool).unwrap_or_default()
    }

    /// Record the track that just started in history and bookkeeping
    pub fn on_stream_start(&mut self, pool: &Pool) {
        if !self.is_active(pool) {
            return;
        }
        let current = &pool.current_track;
        if current.is_none() {
            return;
        }

        if self.history.is_empty() {
            self.history.prepend_current(current.clone());
        } else if self.history.peek_next() == Some(current) {
            self.history.next();
        } else if self.history.peek_prev() == Some(current) {
            self.history.prev();
        } else if self.history.current() != Some(current) {
            self.history.prepend_current(current.clone());
        }
        self.record_played(current);
    }

    /// Switch party mode, starting a fresh session
    pub fn set_party(&mut self, party: bool, pool: &mut Pool, library: &dyn Library) {
        self.party = party;
        self.reset_history(pool, library);
    }

    /// Forget the session: history, bookkeeping and the playlist pool
    ///
    /// In party mode the tracks of the NOPARTY playlist are seeded as
    /// already played so they are never picked.
    pub fn reset_history(&mut self, pool: &mut Pool, library: &dyn Library) {
        self.clear_bookkeeping();
        pool.playlist_tracks.clear();
        pool.playlist_ids.clear();
        if self.party {
            self.seed_party_blacklist(library);
        }
    }

    /// Forget history and played bookkeeping, keeping the pool
    pub fn clear_session(&mut self) {
        self.clear_bookkeeping();
    }

    fn clear_bookkeeping(&mut self) {
        self.history.clear();
        self.played_tracks.clear();
        self.exhausted_albums.clear();
    }

    fn seed_party_blacklist(&mut self, library: &dyn Library) {
        let track_ids = match library.playlist_track_ids(ids::NOPARTY) {
            Ok(track_ids) => track_ids,
            Err(e) => {
                warn!("Party blacklist unavailable: {}", e);
                return;
            }
        };
        for id in track_ids {
            match library.track(id) {
                Ok(track) => self.record_played(&track),
                Err(e) => debug!("Skipping blacklisted track {}: {}", id, e),
            }
        }
    }

    fn record_played(&mut self, track: &Track) {
        if let Some(id) = track.id {
            self.played_tracks
                .entry(track.album_id)
                .or_default()
                .insert(id);
        }
    }

    fn fresh_candidate(&mut self, pool: &mut Pool, library: &dyn Library) -> Track {
        let track_level = pool.shuffle == Shuffle::Tracks || self.party;
        for pass in 0..MAX_SELECTION_PASSES {
            let candidate = if !track_level {
                self.albums_random(pool, library)
            } else if pool.albums.is_empty() {
                self.playlists_random(pool)
            } else {
                self.tracks_random(pool)
            };

            match candidate {
                Some(track) => return track,
                None if track_level => {
                    info!("Shuffle pool exhausted, stopping after current track");
                    pool.next_context = NextContext::Stop;
                    // History stays navigable, a restart serves every track again
                    self.played_tracks.clear();
                    self.exhausted_albums.clear();
                    return Track::default();
                }
                None => {
                    debug!("No album left to shuffle (pass {}), resetting history", pass);
                    self.clear_bookkeeping();
                }
            }
        }
        Track::default()
    }

    /// Next track of the current album, or the first track of a random
    /// album not yet played
    fn albums_random(&mut self, pool: &Pool, library: &dyn Library) -> Option<Track> {
        let current = &pool.current_track;
        if let Some(album_id) = current.album_id {
            let album = pool
                .album(album_id)
                .cloned()
                .or_else(|| library.album(album_id).ok());
            if let Some(track) = album
                .as_ref()
                .and_then(|album| album.tracks.get(current.position + 1))
            {
                return Some(track.clone());
            }
            self.exhausted_albums.insert(Some(album_id));
        }

        let mut albums: Vec<&Album> = pool
            .albums
            .iter()
            .filter(|album| {
                !album.tracks.is_empty()
                    && Some(album.id) != current.album_id
                    && !self.exhausted_albums.contains(&Some(album.id))
            })
            .collect();
        albums.shuffle(&mut thread_rng());
        albums
            .first()
            .and_then(|album| album.tracks.first())
            .cloned()
    }

    /// Random track from the playlist pool
    fn playlists_random(&self, pool: &Pool) -> Option<Track> {
        let mut tracks: Vec<&Track> = pool.playlist_tracks.iter().collect();
        tracks.shuffle(&mut thread_rng());
        tracks
            .into_iter()
            .find(|track| **track != pool.current_track && !self.is_played(track))
            .cloned()
    }

    /// Random never-played track from the album pool
    ///
    /// Albums found fully played move from the played map to the exhausted
    /// set and are skipped from then on.
    fn tracks_random(&mut self, pool: &Pool) -> Option<Track> {
        let mut rng = thread_rng();
        let mut albums: Vec<&Album> = pool
            .albums
            .iter()
            .filter(|album| !self.exhausted_albums.contains(&Some(album.id)))
            .collect();
        albums.shuffle(&mut rng);

        for album in albums {
            let mut tracks: Vec<&Track> = album.tracks.iter().collect();
            tracks.shuffle(&mut rng);
            if let Some(track) = tracks
                .into_iter()
                .find(|track| **track != pool.current_track && !self.is_played(track))
            {
                return Some(track.clone());
            }
            if self.played_tracks.remove(&Some(album.id)).is_some() {
                self.exhausted_albums.insert(Some(album.id));
            }
        }
        None
    }
}
