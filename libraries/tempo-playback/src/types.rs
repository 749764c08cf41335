//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Shuffle mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shuffle {
    /// Linear playback through albums or playlist
    #[default]
    None,

    /// Random track from the pool, never repeating within a session
    Tracks,

    /// Albums play in order, the next album is picked at random
    Albums,
}

/// What happens once the current track has no successor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextContext {
    /// Continue playback
    #[default]
    None,

    /// Repeat the current track
    RepeatTrack,

    /// Stop after the current track
    Stop,
}
