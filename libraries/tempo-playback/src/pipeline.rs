//! Platform-agnostic playback pipeline contract
//!
//! Abstracts the media framework (decoder, volume element, sink) so the
//! [`Player`](crate::Player) can drive GStreamer on desktop or a fake in
//! tests.

use crate::error::Result;
use std::time::Duration;

/// Pipeline state, mirroring the media framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Torn down, no resources held
    #[default]
    Null,
    /// Resources allocated, not prerolled
    Ready,
    /// Prerolled, clock stopped
    Paused,
    /// Clock running, audio flowing
    Playing,
}

/// One of the two interchangeable main pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineSlot {
    #[default]
    Primary,
    Secondary,
}

impl PipelineSlot {
    /// The slot a crossfade switches to
    pub fn other(self) -> Self {
        match self {
            PipelineSlot::Primary => PipelineSlot::Secondary,
            PipelineSlot::Secondary => PipelineSlot::Primary,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PipelineSlot::Primary => 0,
            PipelineSlot::Secondary => 1,
        }
    }
}

/// What a pipeline is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRole {
    /// Main playback, one of two crossfade slots
    Playback(PipelineSlot),
    /// Short audition playback on a separate output
    Preview,
}

/// Metadata carried by an in-stream tag message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamTags {
    pub title: Option<String>,
    pub artists: Vec<String>,
}

/// Bus messages a pipeline reports back to the player
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Playback will reach the end soon; the next URI may be queued now
    AboutToFinish,
    /// Playback reached the end of the stream
    EndOfStream,
    /// A new stream started flowing
    StreamStart,
    /// Fatal pipeline error
    Error {
        message: String,
        /// The error was caused by a missing decoder/plugin
        missing_codec: bool,
    },
    /// In-stream metadata (mostly radio title updates)
    Tag(StreamTags),
    /// An element reported a plugin it could not find
    MissingPlugin(String),
}

/// Platform-agnostic playback pipeline
///
/// Two channel volumes are involved: the logical volume, shared by every
/// pipeline and set by the user, and the fade level, private to one
/// pipeline and driven by crossfade ramps.
pub trait Pipeline {
    /// Set the source URI
    ///
    /// Only valid while the pipeline is in [`PipelineState::Null`].
    fn set_uri(&mut self, uri: &str) -> Result<()>;

    /// Request a state change
    fn set_state(&mut self, state: PipelineState) -> Result<()>;

    /// Current state
    fn state(&self) -> PipelineState;

    /// Set the logical (user) volume, 0.0 to 1.0
    fn set_volume(&mut self, rate: f64);

    /// Set the fade level, 0.0 to 1.0
    fn set_fade_level(&mut self, level: f64);

    /// Current fade level
    fn fade_level(&self) -> f64;

    /// Playback position, `None` if the query failed
    fn position(&self) -> Option<Duration>;

    /// Flushing seek to `position`
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Route output to another device
    fn set_output(&mut self, device: &str) -> Result<()>;
}

/// Creates pipelines for the player
pub trait PipelineBackend {
    /// Build a pipeline for `role`
    ///
    /// # Errors
    /// Returns an error if the media framework cannot build the pipeline
    fn create(&self, role: PipelineRole) -> Result<Box<dyn Pipeline>>;
}
