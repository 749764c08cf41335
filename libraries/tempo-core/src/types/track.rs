//! Track domain type

use super::ids::{self, AlbumId, TrackId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// Playable track
///
/// Identity is the `id`: two tracks compare equal when their ids match, even
/// if one of them carries metadata resolved later from stream tags.
/// `Track::default()` has no id and means "nothing loaded".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    /// Library id, a sentinel from [`ids`], or `None` for the empty track
    pub id: Option<TrackId>,

    /// Location handed to the playback pipeline
    pub uri: String,

    /// Track duration, `Duration::ZERO` when unknown until tags arrive
    pub duration: Duration,

    /// Display name
    pub name: String,

    /// Track artists
    pub artists: Vec<String>,

    /// Album artists, used as a fallback when the stream names no artist
    pub album_artists: Vec<String>,

    /// Owning album
    pub album_id: Option<AlbumId>,

    /// Zero-based position within the album
    pub position: usize,

    /// Play counter maintained by the library
    pub popularity: u32,
}

impl Track {
    /// Create a track with an id and uri
    pub fn new(id: TrackId, uri: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Create an internet radio pseudo-track
    ///
    /// `uri` usually points at a playlist (pls/m3u) that still needs resolving.
    pub fn radio(name: impl Into<String>, uri: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Some(ids::RADIOS),
            uri: uri.into(),
            album_artists: vec![name.clone()],
            name,
            ..Self::default()
        }
    }

    /// Set the owning album and position
    pub fn with_album(mut self, album_id: AlbumId, position: usize) -> Self {
        self.album_id = Some(album_id);
        self.position = position;
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// True for the empty "nothing loaded" track
    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }

    /// True if the track has an id
    pub fn is_some(&self) -> bool {
        self.id.is_some()
    }

    /// True for internet radio streams
    pub fn is_radio(&self) -> bool {
        self.id == Some(ids::RADIOS)
    }

    /// True if the track is a library row (non-negative id)
    pub fn is_catalogued(&self) -> bool {
        self.id.is_some_and(ids::is_catalogued)
    }

    /// Replace the playable uri
    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
