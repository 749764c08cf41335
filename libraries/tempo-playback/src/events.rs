//! Player Events
//!
//! Fire-and-forget notifications for the UI, MPRIS and toolbar.
//! Events are queued by the [`Player`](crate::Player) and drained by the
//! host event loop:
//! - Current track changes (stream start, tag updates, stop)
//! - Status changes (play/pause/stop)
//! - Party mode and volume changes
//! - Seeks and user-visible errors

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tempo_core::Track;

/// Coarse playback status of the active pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing playing
    #[default]
    Stopped,
    /// Paused mid-track
    Paused,
    /// Playing audio
    Playing,
}

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// The current track changed or its metadata was updated
    CurrentChanged {
        /// The new current track (empty after stop)
        track: Track,
    },

    /// Playback status changed
    StatusChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// Party mode switched on or off
    PartyChanged {
        /// Whether party mode is now on
        enabled: bool,
    },

    /// Logical volume changed
    VolumeChanged {
        /// New volume rate (0.0-1.0)
        rate: f64,
    },

    /// Playback position jumped
    Seeked {
        /// New position
        position: Duration,
    },

    /// Playback failed; shown to the user
    Error {
        /// Error message
        message: String,
    },

    /// Playback failed for lack of codecs; the host should offer to
    /// install them
    CodecInstallRequested {
        /// Missing plugin descriptions, as reported by the pipeline
        codecs: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_stopped() {
        assert_eq!(PlaybackStatus::default(), PlaybackStatus::Stopped);
    }

    #[test]
    fn events_serialize_for_ipc() {
        let event = PlayerEvent::PartyChanged { enabled: true };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("PartyChanged"));

        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
