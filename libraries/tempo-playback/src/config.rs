//! Player settings
use crate::error::{PlaybackError, Result};
use crate::types::{NextContext, Shuffle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted transition, in seconds
pub const MAX_TRANSITION_SECS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Crossfade between tracks instead of gapless switching
    pub crossfade: bool,

    /// Crossfade length in seconds
    pub transition_duration: u32,

    pub shuffle: Shuffle,

    /// Configured end-of-pool policy
    pub playback: NextContext,

    /// Genre ids restricting the party pool, empty for the whole library
    pub party_ids: Vec<i64>,

    /// Output device for the preview pipeline
    pub preview_output: Option<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            crossfade: false,
            transition_duration: 5,
            shuffle: Shuffle::None,
            playback: NextContext::None,
            party_ids: Vec::new(),
            preview_output: None,
        }
    }
}

impl PlayerSettings {
    /// Load settings from an optional TOML file and the environment
    ///
    /// Environment variables use the `TEMPO_` prefix, e.g.
    /// `TEMPO_TRANSITION_DURATION=3` or `TEMPO_PARTY_IDS=1,4,-2`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(false));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TEMPO")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("party_ids")
                .try_parsing(true),
        );

        let loaded: Self = settings.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.transition_duration > MAX_TRANSITION_SECS {
            return Err(PlaybackError::Config(format!(
                "transition_duration must be at most {} seconds, got {}",
                MAX_TRANSITION_SECS, self.transition_duration
            )));
        }
        Ok(())
    }

    /// Crossfade length
    pub fn transition(&self) -> Duration {
        Duration::from_secs(u64::from(self.transition_duration))
    }
}
