//! Album types

use super::ids::{self, AlbumId, ArtistId, TrackId};
use super::track::Track;
use serde::{Deserialize, Serialize};

/// An album with its tracks in play order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub artist_ids: Vec<ArtistId>,
    pub tracks: Vec<Track>,
}

impl Album {
    /// Create an album without tracks
    pub fn new(id: AlbumId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            artist_ids: Vec::new(),
            tracks: Vec::new(),
        }
    }

    /// Attach tracks, stamping each with this album id and its position
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks
            .into_iter()
            .enumerate()
            .map(|(position, track)| track.with_album(self.id, position))
            .collect();
        self
    }

    /// True if the album is credited to "various artists"
    pub fn is_compilation(&self) -> bool {
        self.artist_ids.contains(&ids::COMPILATIONS)
    }

    /// Ids of the album tracks, in order
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.iter().filter_map(|t| t.id).collect()
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Album {}
