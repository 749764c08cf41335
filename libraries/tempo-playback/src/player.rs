//! Playback core
//!
//! The [`Player`] owns two interchangeable main pipelines (so the outgoing
//! and incoming tracks can overlap during a crossfade) plus a lazily created
//! preview pipeline. It is passive: the host event loop forwards pipeline
//! events, ticks fade ramps, polls the position and drains notifications.
//!
//! ```text
//! Host Event Loop                         Player
//!     │ handle_pipeline_event(slot, ev)     │ gapless / EOS / tags / errors
//!     │────────────────────────────────────>│
//!     │ tick()            every 250ms       │ crossfade ramps
//!     │────────────────────────────────────>│
//!     │ position()        every second      │ crossfade trigger
//!     │────────────────────────────────────>│
//!     │ poll_radio()                        │ radio playlist results
//!     │────────────────────────────────────>│
//!     │ drain_events()                      │
//!     │<────────────────────────────────────│
//! ```

use crate::{
    accounting,
    config::PlayerSettings,
    crossfade::{FadeDirection, FadeRamp, RampStatus},
    error::{PlaybackError, Result},
    events::{PlaybackStatus, PlayerEvent},
    pipeline::{
        Pipeline, PipelineBackend, PipelineEvent, PipelineRole, PipelineSlot, PipelineState,
        StreamTags,
    },
    pool::Pool,
    radio::{PlaylistParser, RadioResolver},
    shuffle::ShuffleEngine,
    types::{NextContext, Shuffle},
    volume::Volume,
};
use chrono::Utc;
use std::rc::Rc;
use std::time::Duration;
use tempo_core::{ids, Album, AlbumId, GenreId, Library, Scrobbler, Track, TrackId};
use tracing::{debug, error, info, warn};

/// Dual-pipeline player
pub struct Player {
    settings: PlayerSettings,

    // Track selection state
    pool: Pool,
    shuffle: ShuffleEngine,

    // Pipelines
    backend: Box<dyn PipelineBackend>,
    pipelines: [Box<dyn Pipeline>; 2],
    active: PipelineSlot,
    preview: Option<Box<dyn Pipeline>>,

    volume: Volume,
    fades: Vec<FadeRamp>,
    radio: RadioResolver,

    // Collaborators
    library: Rc<dyn Library>,
    scrobblers: Vec<Box<dyn Scrobbler>>,

    /// Unix timestamp of the last stream start
    started_at: i64,
    locked: bool,

    /// Plugins reported missing since the last codec error
    missing_codecs: Vec<String>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl Player {
    /// Create a player with both main pipelines
    ///
    /// # Errors
    /// Returns an error if the settings are invalid or the backend cannot
    /// build a pipeline
    pub fn new(
        settings: PlayerSettings,
        backend: Box<dyn PipelineBackend>,
        library: Rc<dyn Library>,
        parser: Box<dyn PlaylistParser>,
    ) -> Result<Self> {
        settings.validate()?;

        let primary = backend.create(PipelineRole::Playback(PipelineSlot::Primary))?;
        let secondary = backend.create(PipelineRole::Playback(PipelineSlot::Secondary))?;

        let mut player = Self {
            pool: Pool::new(settings.shuffle),
            settings,
            shuffle: ShuffleEngine::new(),
            backend,
            pipelines: [primary, secondary],
            active: PipelineSlot::Primary,
            preview: None,
            volume: Volume::default(),
            fades: Vec::new(),
            radio: RadioResolver::new(parser),
            library,
            scrobblers: Vec::new(),
            started_at: 0,
            locked: false,
            missing_codecs: Vec::new(),
            pending_events: Vec::new(),
        };
        let rate = player.volume.rate();
        for pipeline in &mut player.pipelines {
            pipeline.set_volume(rate);
        }
        Ok(player)
    }

    /// Register a scrobbler service
    pub fn add_scrobbler(&mut self, scrobbler: Box<dyn Scrobbler>) {
        self.scrobblers.push(scrobbler);
    }

    // ===== State =====

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn current_track(&self) -> &Track {
        &self.pool.current_track
    }

    pub fn next_track(&self) -> &Track {
        &self.pool.next_track
    }

    pub fn prev_track(&self) -> &Track {
        &self.pool.prev_track
    }

    pub fn shuffle_engine(&self) -> &ShuffleEngine {
        &self.shuffle
    }

    /// Slot of the pipeline currently producing the audible track
    pub fn active_slot(&self) -> PipelineSlot {
        self.active
    }

    /// True if the active pipeline is playing
    pub fn is_playing(&self) -> bool {
        self.active_pipeline().state() == PipelineState::Playing
    }

    /// Playback status of the active pipeline
    pub fn status(&self) -> PlaybackStatus {
        match self.active_pipeline().state() {
            PipelineState::Playing => PlaybackStatus::Playing,
            PipelineState::Paused => PlaybackStatus::Paused,
            PipelineState::Null | PipelineState::Ready => PlaybackStatus::Stopped,
        }
    }

    pub fn is_party(&self) -> bool {
        self.shuffle.is_party()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock seeking
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Logical volume rate (0.0-1.0)
    pub fn volume(&self) -> f64 {
        self.volume.rate()
    }

    /// Number of fade ramps still running
    pub fn active_fades(&self) -> usize {
        self.fades.len()
    }

    // ===== Transport =====

    /// Load `track` and play it
    ///
    /// Crossfades when enabled and something non-radio is playing,
    /// otherwise stops, loads and resumes. Radio tracks go through playlist
    /// resolution first.
    pub fn load(&mut self, track: Track) {
        if track.is_radio() {
            self.load_radio(track, true);
            return;
        }
        self.radio.cancel();

        let current = &self.pool.current_track;
        if self.settings.crossfade && current.is_some() && !current.is_radio() && self.is_playing()
        {
            self.crossfade(self.settings.transition(), Some(track), false);
        } else {
            self.load_direct(track, true);
        }
    }

    /// Resolve a radio playlist and start it once resolved
    ///
    /// Switches party mode off: radios are not part of any party.
    pub fn load_radio(&mut self, track: Track, play: bool) {
        if let Err(e) = self.radio.request(track, play) {
            error!("Failed to resolve radio: {}", e);
            self.emit(PlayerEvent::Error {
                message: e.to_string(),
            });
        }
        if self.is_party() {
            self.set_party(false);
        }
    }

    /// Start playback, or load the next track if nothing is loaded
    pub fn play(&mut self) {
        if self.pool.current_track.is_none() {
            if self.pool.next_track.is_some() {
                let next = self.pool.next_track.clone();
                self.load(next);
            }
            return;
        }
        self.set_active_state(PipelineState::Playing);
        self.emit_status();
    }

    /// Pause playback
    ///
    /// Radio streams cannot be resumed where they stopped, so their
    /// pipeline is torn down instead.
    pub fn pause(&mut self) {
        if self.pool.current_track.is_radio() {
            self.set_active_state(PipelineState::Null);
        } else {
            self.set_active_state(PipelineState::Paused);
        }
        self.emit_status();
    }

    /// Stop playback and forget the current track
    pub fn stop(&mut self) {
        self.set_active_state(PipelineState::Null);
        self.pool.current_track = Track::default();
        self.emit_status();
        self.emit_current();
    }

    /// Stop both main pipelines, for shutdown
    pub fn stop_all(&mut self) {
        for pipeline in &mut self.pipelines {
            if let Err(e) = pipeline.set_state(PipelineState::Null) {
                warn!("Failed to stop pipeline: {}", e);
            }
        }
    }

    pub fn play_pause(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Load the precomputed next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.pool.next_track.is_some() {
            let next = self.pool.next_track.clone();
            self.load(next);
        }
    }

    /// Load the precomputed previous track
    pub fn prev(&mut self) {
        if self.pool.prev_track.is_some() {
            let prev = self.pool.prev_track.clone();
            self.load(prev);
        }
    }

    /// Seek in the current track
    ///
    /// Ignored while locked or with nothing loaded. Seeking to or past the
    /// end skips to the next track instead.
    pub fn seek(&mut self, position: Duration) {
        if self.locked || self.pool.current_track.is_none() {
            return;
        }
        if position >= self.pool.current_track.duration {
            self.next();
            return;
        }
        match self.active_pipeline_mut().seek(position) {
            Ok(()) => self.emit(PlayerEvent::Seeked { position }),
            Err(e) => warn!("Seek to {:?} failed: {}", position, e),
        }
    }

    /// Playback position of the active pipeline
    ///
    /// Meant to be polled once per second: when crossfading is enabled and
    /// the current track is about to end, this starts the crossfade into
    /// the next track.
    pub fn position(&mut self) -> Duration {
        let Some(position) = self.active_pipeline().position() else {
            return Duration::ZERO;
        };

        let duration = self.pool.current_track.duration;
        if self.settings.crossfade && !duration.is_zero() {
            let remaining = duration.saturating_sub(position);
            if remaining < self.settings.transition() {
                self.crossfade(remaining, None, true);
            }
        }
        position
    }

    /// Set the logical volume on every pipeline
    pub fn set_volume(&mut self, rate: f64) {
        self.volume.set_rate(rate);
        let rate = self.volume.rate();
        for pipeline in &mut self.pipelines {
            pipeline.set_volume(rate);
        }
        if let Some(preview) = self.preview.as_mut() {
            preview.set_volume(rate);
        }
        self.emit(PlayerEvent::VolumeChanged { rate });
    }

    // ===== Crossfade =====

    /// Advance fade ramps by one step
    ///
    /// Call every [`FADE_STEP`](crate::crossfade::FADE_STEP).
    ///
    /// A fade-out that completes with nothing loaded behind it ends
    /// playback: the player goes to the stopped state and notifies.
    pub fn tick(&mut self) {
        let active = self.active;
        let pipelines = &mut self.pipelines;
        let mut faded_out = false;
        self.fades.retain_mut(|ramp| {
            let pipeline = pipelines[ramp.slot().index()].as_mut();
            match ramp.step(pipeline, active) {
                RampStatus::Running => true,
                RampStatus::Finished => {
                    faded_out |= ramp.direction() == FadeDirection::Down;
                    false
                }
                RampStatus::Cancelled => false,
            }
        });

        if faded_out
            && self.pool.current_track.is_some()
            && self.active_pipeline().state() == PipelineState::Null
        {
            info!("Faded out with no next track, stopping");
            self.stop();
        }
    }

    /// Fade the active pipeline out and `track` (or the next/previous
    /// track) in on the other one
    ///
    /// `track == None` is a natural advance: the finishing track is
    /// accounted for first.
    fn crossfade(&mut self, duration: Duration, track: Option<Track>, next: bool) {
        if next && self.need_to_stop() {
            return;
        }
        let natural = track.is_none();
        if natural {
            self.finish_current();
        }

        let target = track.unwrap_or_else(|| {
            if next {
                self.pool.next_track.clone()
            } else {
                self.pool.prev_track.clone()
            }
        });

        let outgoing = self.active;
        info!(
            "Crossfading over {:?} from {:?} to {:?}",
            duration,
            outgoing,
            outgoing.other()
        );
        self.start_fade(FadeRamp::down(outgoing, duration));
        self.active = outgoing.other();

        if target.is_some() {
            self.active_pipeline_mut().set_fade_level(0.0);
            self.load_direct(target, false);
            self.start_fade(FadeRamp::up(self.active, duration));
        }
    }

    /// Replace any ramp already running on the ramp's pipeline
    fn start_fade(&mut self, ramp: FadeRamp) {
        self.fades.retain(|running| running.slot() != ramp.slot());
        self.fades.push(ramp);
    }

    // ===== Loading =====

    /// Stop, load, then resume if playing before
    fn load_direct(&mut self, track: Track, init_volume: bool) {
        let was_playing = self.is_playing();
        self.set_active_state(PipelineState::Null);
        if self.load_track(track, init_volume) {
            if was_playing {
                self.set_active_state(PipelineState::Playing);
            } else {
                self.play();
            }
        }
    }

    /// Make `track` current and hand its URI to the active pipeline
    ///
    /// Returns false if the stop policy says playback should end here or
    /// the pipeline rejected the URI.
    fn load_track(&mut self, track: Track, init_volume: bool) -> bool {
        if self.need_to_stop() {
            debug!("Not loading {}: playback should stop", track.uri);
            return false;
        }
        if init_volume {
            self.active_pipeline_mut().set_fade_level(1.0);
        }

        debug!("Loading {}", track.uri);
        if let Some(id) = track.id {
            self.pool.queue.remove(id);
        }
        let uri = track.uri.clone();
        self.pool.current_track = track;
        if let Err(e) = self.active_pipeline_mut().set_uri(&uri) {
            error!("Failed to load {}: {}", uri, e);
            return false;
        }
        true
    }

    /// True if the configured stop policy applies and playback is running
    fn need_to_stop(&self) -> bool {
        self.stop_requested() && self.is_playing()
    }

    fn stop_requested(&self) -> bool {
        self.settings.playback == NextContext::Stop
            && (self.pool.is_drained() || self.pool.next_context == NextContext::Stop)
    }

    /// Scrobble and bump popularity of the finishing track
    fn finish_current(&self) {
        accounting::finish_track(
            self.library.as_ref(),
            &self.scrobblers,
            &self.pool.current_track,
            self.started_at,
            Utc::now().timestamp(),
            self.is_party(),
        );
    }

    // ===== Radio =====

    /// Apply radio parser results received so far
    pub fn poll_radio(&mut self) {
        if let Some((track, play)) = self.radio.poll() {
            self.start_radio(track, play);
        }
    }

    fn start_radio(&mut self, track: Track, play: bool) {
        info!("Starting radio {} at {}", track.name, track.uri);
        self.active_pipeline_mut().set_fade_level(1.0);
        self.set_active_state(PipelineState::Null);
        if let Err(e) = self.active_pipeline_mut().set_uri(&track.uri) {
            error!("Failed to load radio {}: {}", track.uri, e);
            self.emit(PlayerEvent::Error {
                message: e.to_string(),
            });
            return;
        }
        self.pool.current_track = track;
        if play {
            self.set_active_state(PipelineState::Playing);
            self.emit_status();
        } else {
            self.emit_current();
        }
    }

    // ===== Pipeline Events =====

    /// Dispatch a message from the pipeline in `slot`
    ///
    /// Apart from missing plugin reports, messages from the inactive
    /// pipeline are ignored: it is fading out or idle.
    pub fn handle_pipeline_event(&mut self, slot: PipelineSlot, event: PipelineEvent) {
        match event {
            PipelineEvent::MissingPlugin(detail) => {
                debug!("Missing plugin: {}", detail);
                self.missing_codecs.push(detail);
            }
            _ if slot != self.active => {
                debug!("Ignoring {:?} from inactive pipeline {:?}", event, slot);
            }
            PipelineEvent::AboutToFinish => self.on_about_to_finish(),
            PipelineEvent::EndOfStream => self.on_end_of_stream(),
            PipelineEvent::StreamStart => self.on_stream_start(),
            PipelineEvent::Tag(tags) => self.on_tag(tags),
            PipelineEvent::Error {
                message,
                missing_codec,
            } => self.on_error(message, missing_codec),
        }
    }

    /// Gapless hand-over to the next track
    fn on_about_to_finish(&mut self) {
        // Crossfade owns transitions when enabled
        if self.settings.crossfade || self.pool.current_track.is_radio() {
            return;
        }
        self.finish_current();
        if self.pool.next_track.is_some() {
            let next = self.pool.next_track.clone();
            self.load_track(next, true);
        }
    }

    fn on_end_of_stream(&mut self) {
        info!("End of stream: {}", self.pool.current_track.uri);
        let stop_requested = self.stop_requested();
        self.stop();
        self.pool.next_context = NextContext::None;

        if self.pool.next_track.is_none() {
            return;
        }
        let next = self.pool.next_track.clone();
        if stop_requested {
            // Select the next track without starting it
            self.load_track(next, true);
            self.emit_current();
        } else {
            self.load_direct(next, true);
        }
    }

    fn on_stream_start(&mut self) {
        self.started_at = Utc::now().timestamp();
        debug!("Stream start: {}", self.pool.current_track.uri);
        self.emit_current();

        let current = &self.pool.current_track;
        for scrobbler in self.scrobblers.iter().filter(|s| s.is_available()) {
            scrobbler.playing_now(current);
        }
        if !self.library.is_locked() {
            if let Some(id) = current.id.filter(|id| ids::is_catalogued(*id)) {
                if let Err(e) = self.library.set_listened_at(id, self.started_at) {
                    debug!("Could not store listened_at for {}: {}", id, e);
                }
            }
        }

        self.shuffle.on_stream_start(&self.pool);
        self.set_next();
        self.set_prev();
    }

    /// Update radio metadata from in-stream tags
    ///
    /// Only streams without a library id and without a known duration are
    /// touched; some radios resend their tags every second.
    fn on_tag(&mut self, tags: StreamTags) {
        let current = &mut self.pool.current_track;
        let Some(id) = current.id else {
            return;
        };
        if ids::is_catalogued(id) || !current.duration.is_zero() {
            return;
        }

        let mut changed = false;
        if let Some(title) = tags.title.filter(|title| !title.is_empty()) {
            if current.name != title {
                current.name = title;
                changed = true;
            }
        }
        if current.name.is_empty() {
            current.name = current.uri.clone();
            changed = true;
        }
        if !tags.artists.is_empty() && current.artists != tags.artists {
            current.artists = tags.artists;
            changed = true;
        }
        if current.artists.is_empty() && !current.album_artists.is_empty() {
            current.artists = current.album_artists.clone();
            changed = true;
        }

        if changed {
            self.emit_current();
        }
    }

    fn on_error(&mut self, message: String, missing_codec: bool) {
        info!("Pipeline error: {}", message);
        if missing_codec {
            let codecs = std::mem::take(&mut self.missing_codecs);
            self.emit(PlayerEvent::CodecInstallRequested { codecs });
        } else {
            self.emit(PlayerEvent::Error { message });
        }
        self.stop();
    }

    // ===== Next/Prev Resolution =====

    /// Recompute the next track
    pub fn set_next(&mut self) {
        self.pool.next_track = self.compute_next();
    }

    /// Recompute the previous track
    pub fn set_prev(&mut self) {
        self.pool.prev_track = self.compute_prev();
    }

    fn compute_next(&mut self) -> Track {
        if self.settings.playback == NextContext::RepeatTrack
            || self.pool.next_context == NextContext::RepeatTrack
        {
            return self.pool.current_track.clone();
        }
        if let Some(id) = self.pool.queue.front() {
            match self.library.track(id) {
                Ok(track) => return track,
                Err(e) => warn!("Queued track {} unavailable: {}", id, e),
            }
        }
        if self.shuffle.is_active(&self.pool) {
            return self.shuffle.next(&mut self.pool, self.library.as_ref());
        }
        self.pool.linear_next()
    }

    fn compute_prev(&self) -> Track {
        if self.shuffle.is_active(&self.pool) {
            self.shuffle.prev(&self.pool)
        } else {
            self.pool.linear_prev()
        }
    }

    /// Override what happens after the current track
    pub fn set_next_context(&mut self, context: NextContext) {
        self.pool.next_context = context;
        self.set_next();
    }

    // ===== Shuffle & Party =====

    /// Change the shuffle mode
    ///
    /// Switching shuffle off (outside party mode) ends the shuffle session:
    /// history and played bookkeeping are forgotten.
    pub fn set_shuffle(&mut self, shuffle: Shuffle) {
        self.settings.shuffle = shuffle;
        self.pool.shuffle = shuffle;
        if shuffle == Shuffle::None && !self.is_party() {
            self.shuffle.clear_session();
        }
        if self.pool.current_track.is_some() {
            self.set_next();
            self.set_prev();
        }
    }

    /// Forget shuffle history and the playlist pool
    pub fn reset_history(&mut self) {
        self.shuffle
            .reset_history(&mut self.pool, self.library.as_ref());
        self.set_next();
        self.set_prev();
    }

    /// Switch party mode
    ///
    /// Turning it on fills the pool with the party albums and starts a
    /// random track if nothing (or a radio) is playing. Turning it off keeps
    /// the current album in the pool so playback carries on from it.
    pub fn set_party(&mut self, party: bool) {
        info!("Party mode {}", if party { "on" } else { "off" });
        self.shuffle
            .set_party(party, &mut self.pool, self.library.as_ref());

        if party {
            self.pool.external_tracks.clear();
            self.pool.albums = self.party_albums();

            let current = &self.pool.current_track;
            let start_new = (current.is_none() || current.is_radio()) && !self.pool.albums.is_empty();
            let track = if start_new {
                self.shuffle.random_track(&self.pool)
            } else {
                Track::default()
            };

            if track.is_some() {
                self.load(track);
            } else {
                self.set_next();
                self.set_prev();
                if !self.is_playing() {
                    self.play();
                }
            }
        } else {
            self.keep_current_album();
            self.set_next();
            self.set_prev();
        }
        self.emit(PlayerEvent::PartyChanged { enabled: party });
    }

    /// Configured party genre ids that still exist
    ///
    /// POPULARS and RECENTS are accepted as pseudo-genres.
    pub fn party_genre_filter(&self) -> Vec<GenreId> {
        let mut known = self.library.genre_ids().unwrap_or_else(|e| {
            warn!("Failed to list genres: {}", e);
            Vec::new()
        });
        known.push(ids::POPULARS);
        known.push(ids::RECENTS);
        self.settings
            .party_ids
            .iter()
            .copied()
            .filter(|id| known.contains(id))
            .collect()
    }

    fn party_albums(&self) -> Vec<Album> {
        let filter = self.party_genre_filter();
        let album_ids = if filter.is_empty() {
            self.library.album_ids()
        } else {
            self.library.party_album_ids(&filter)
        };
        let album_ids = album_ids.unwrap_or_else(|e| {
            warn!("Failed to list party albums: {}", e);
            Vec::new()
        });
        album_ids
            .into_iter()
            .filter_map(|id| match self.library.album(id) {
                Ok(album) => Some(album),
                Err(e) => {
                    debug!("Skipping party album {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    fn keep_current_album(&mut self) {
        let Some(album_id) = self.pool.current_track.album_id else {
            return;
        };
        if self.pool.album(album_id).is_some() {
            return;
        }
        match self.library.album(album_id) {
            Ok(album) => self.pool.albums.insert(0, album),
            Err(e) => warn!("Current album {} unavailable: {}", album_id, e),
        }
    }

    // ===== Pool =====

    /// Replace the album pool
    pub fn set_albums(&mut self, albums: Vec<Album>) {
        self.pool.albums = albums;
        self.refresh_neighbors();
    }

    pub fn add_album(&mut self, album: Album) {
        if self.pool.album(album.id).is_none() {
            self.pool.albums.push(album);
            self.refresh_neighbors();
        }
    }

    pub fn remove_album(&mut self, id: AlbumId) {
        self.pool.albums.retain(|album| album.id != id);
        self.refresh_neighbors();
    }

    /// Play from playlists: `tracks` are the concatenated playlist tracks
    pub fn set_playlist(&mut self, playlist_ids: Vec<i64>, tracks: Vec<Track>) {
        self.pool.playlist_ids = playlist_ids;
        self.pool.playlist_tracks = tracks;
        self.refresh_neighbors();
    }

    /// Tracks opened from outside the library
    pub fn set_external_tracks(&mut self, tracks: Vec<Track>) {
        self.pool.external_tracks = tracks;
        self.refresh_neighbors();
    }

    // ===== Queue =====

    pub fn append_to_queue(&mut self, id: TrackId) {
        self.pool.queue.append(id);
        self.set_next();
    }

    pub fn insert_in_queue(&mut self, id: TrackId, position: usize) {
        self.pool.queue.insert(id, position);
        self.set_next();
    }

    pub fn remove_from_queue(&mut self, id: TrackId) -> bool {
        let removed = self.pool.queue.remove(id);
        if removed {
            self.set_next();
        }
        removed
    }

    pub fn reorder_queue(&mut self, from: usize, to: usize) -> Result<()> {
        self.pool.queue.reorder(from, to).map_err(PlaybackError::Queue)?;
        self.set_next();
        Ok(())
    }

    pub fn clear_queue(&mut self) {
        self.pool.queue.clear();
        self.set_next();
    }

    fn refresh_neighbors(&mut self) {
        if self.pool.current_track.is_some() {
            self.set_next();
            self.set_prev();
        }
    }

    // ===== Preview =====

    /// Preview pipeline, created on first use
    pub fn preview(&mut self) -> Result<&mut dyn Pipeline> {
        let pipeline = match self.preview.take() {
            Some(pipeline) => pipeline,
            None => self.create_preview()?,
        };
        Ok(self.preview.insert(pipeline).as_mut())
    }

    /// Route the preview pipeline to another output device
    pub fn set_preview_output(&mut self, device: Option<String>) {
        self.settings.preview_output = device;
        if let (Some(preview), Some(device)) =
            (self.preview.as_mut(), self.settings.preview_output.as_deref())
        {
            if let Err(e) = preview.set_output(device) {
                warn!("Failed to set preview output {}: {}", device, e);
            }
        }
    }

    fn create_preview(&self) -> Result<Box<dyn Pipeline>> {
        let mut pipeline = self.backend.create(PipelineRole::Preview)?;
        pipeline.set_volume(self.volume.rate());
        if let Some(device) = self.settings.preview_output.as_deref() {
            if let Err(e) = pipeline.set_output(device) {
                warn!("Failed to set preview output {}: {}", device, e);
            }
        }
        Ok(pipeline)
    }

    // ===== Events =====

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn emit_status(&mut self) {
        let status = self.status();
        self.emit(PlayerEvent::StatusChanged { status });
    }

    fn emit_current(&mut self) {
        let track = self.pool.current_track.clone();
        self.emit(PlayerEvent::CurrentChanged { track });
    }

    // ===== Pipelines =====

    fn active_pipeline(&self) -> &dyn Pipeline {
        self.pipelines[self.active.index()].as_ref()
    }

    fn active_pipeline_mut(&mut self) -> &mut dyn Pipeline {
        self.pipelines[self.active.index()].as_mut()
    }

    fn set_active_state(&mut self, state: PipelineState) {
        if let Err(e) = self.active_pipeline_mut().set_state(state) {
            warn!("Failed to set {:?} on {:?}: {}", state, self.active, e);
        }
    }
}
