//! Tempo Playback
//!
//! Platform-agnostic playback core for the Tempo music player.
//!
//! This crate provides:
//! - Dual-pipeline playback with timed crossfades (250ms volume steps)
//! - Gapless hand-over on "about to finish"
//! - Shuffle by tracks or albums, never repeating within a session
//! - Party mode over the whole library or a genre filter
//! - Back/forward shuffle history
//! - Manual play queue
//! - Radio playlist resolution off the event loop
//! - Scrobbling and popularity accounting on natural advance
//!
//! # Architecture
//!
//! `tempo-playback` knows nothing about the media framework or storage:
//! - Pipelines come from a [`PipelineBackend`] (GStreamer on desktop)
//! - Tracks and albums come from a [`tempo_core::Library`]
//! - Notifications are queued as [`PlayerEvent`]s and drained by the host
//!
//! The [`Player`] is driven from a single event loop thread: the host
//! forwards pipeline messages, ticks fade ramps every 250ms and polls the
//! position once per second.
//!
//! # Example: Shuffle History
//!
//! ```rust
//! use tempo_playback::History;
//! use tempo_core::Track;
//!
//! let mut history = History::new();
//! history.prepend_current(Track::new(1, "file:///a.ogg"));
//! history.prepend_current(Track::new(2, "file:///b.ogg"));
//!
//! // Back, then forward again to the same track
//! assert_eq!(history.prev().and_then(|t| t.id), Some(1));
//! assert_eq!(history.next().and_then(|t| t.id), Some(2));
//! ```
//!
//! # Example: Queue
//!
//! ```rust
//! use tempo_playback::Queue;
//!
//! let mut queue = Queue::new();
//! queue.append(10);
//! queue.append(11);
//! queue.insert(12, 0);
//!
//! assert_eq!(queue.ids(), &[12, 10, 11]);
//! assert_eq!(queue.pop_front(), Some(12));
//! ```
//!
//! # Example: Settings
//!
//! ```rust,no_run
//! use tempo_playback::PlayerSettings;
//! use std::path::Path;
//!
//! // Defaults, overridden by the file, overridden by TEMPO_* variables
//! let settings = PlayerSettings::load(Some(Path::new("/etc/tempo/player.toml")))?;
//! println!("crossfade over {:?}", settings.transition());
//! # Ok::<(), tempo_playback::PlaybackError>(())
//! ```

pub mod accounting;
mod config;
pub mod crossfade;
mod error;
mod events;
mod history;
pub mod pipeline;
mod player;
mod pool;
mod queue;
pub mod radio;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use config::{PlayerSettings, MAX_TRANSITION_SECS};
pub use error::{PlaybackError, Result};
pub use events::{PlaybackStatus, PlayerEvent};
pub use history::{History, NodeId};
pub use pipeline::{
    Pipeline, PipelineBackend, PipelineEvent, PipelineRole, PipelineSlot, PipelineState,
    StreamTags,
};
pub use player::Player;
pub use pool::Pool;
pub use queue::Queue;
pub use radio::{PlaylistParser, RadioMessage, RadioResolver, ResolutionToken, ThreadedParser};
pub use shuffle::ShuffleEngine;
pub use types::{NextContext, Shuffle};
pub use volume::Volume;
