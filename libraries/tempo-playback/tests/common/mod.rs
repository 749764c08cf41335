//! Shared fakes for the integration tests
//!
//! In-memory library, recording pipelines and scrobblers. Every fake keeps
//! its state behind `Rc<RefCell<..>>` so tests can inspect it after handing
//! the fake to the player.

#![allow(dead_code)]

use crossbeam_channel::Sender;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;
use tempo_core::{
    Album, AlbumId, CoreError, GenreId, Library, Scrobbler, Track, TrackId,
};
use tempo_playback::{
    Pipeline, PipelineBackend, PipelineRole, PipelineSlot, PipelineState, PlayerSettings,
    PlaylistParser, Player, RadioMessage, ResolutionToken,
};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ===== Library =====

/// Track length used by [`album`]
pub const TRACK_LENGTH: Duration = Duration::from_secs(200);

/// Album `id` with `count` tracks, track ids `id * 100 + n`
pub fn album(id: AlbumId, count: i64) -> Album {
    Album::new(id, format!("Album {}", id)).with_tracks(
        (0..count)
            .map(|n| {
                Track::new(id * 100 + n, format!("file:///music/{}/{}.flac", id, n))
                    .with_name(format!("Track {}-{}", id, n))
                    .with_duration(TRACK_LENGTH)
            })
            .collect(),
    )
}

#[derive(Default)]
pub struct MemoryLibrary {
    pub albums: Vec<Album>,
    pub genres: Vec<GenreId>,
    /// Albums per genre, for party filters
    pub genre_albums: HashMap<GenreId, Vec<AlbumId>>,
    pub playlists: HashMap<i64, Vec<TrackId>>,
    pub max_popularity: u32,
    pub locked: Cell<bool>,
    pub track_popularity: RefCell<HashMap<TrackId, u32>>,
    pub album_popularity: RefCell<HashMap<AlbumId, u32>>,
    pub listened_at: RefCell<Vec<(TrackId, i64)>>,
}

impl MemoryLibrary {
    pub fn with_albums(albums: Vec<Album>) -> Self {
        Self {
            albums,
            max_popularity: 100,
            ..Self::default()
        }
    }

    pub fn track_popularity(&self, id: TrackId) -> u32 {
        self.track_popularity.borrow().get(&id).copied().unwrap_or(0)
    }

    pub fn album_popularity(&self, id: AlbumId) -> u32 {
        self.album_popularity.borrow().get(&id).copied().unwrap_or(0)
    }
}

impl Library for MemoryLibrary {
    fn track(&self, id: TrackId) -> tempo_core::Result<Track> {
        self.albums
            .iter()
            .flat_map(|album| album.tracks.iter())
            .find(|track| track.id == Some(id))
            .cloned()
            .ok_or_else(|| CoreError::not_found("Track", id))
    }

    fn album(&self, id: AlbumId) -> tempo_core::Result<Album> {
        self.albums
            .iter()
            .find(|album| album.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Album", id))
    }

    fn album_ids(&self) -> tempo_core::Result<Vec<AlbumId>> {
        Ok(self.albums.iter().map(|album| album.id).collect())
    }

    fn party_album_ids(&self, genre_ids: &[GenreId]) -> tempo_core::Result<Vec<AlbumId>> {
        let mut album_ids: Vec<AlbumId> = genre_ids
            .iter()
            .filter_map(|genre| self.genre_albums.get(genre))
            .flatten()
            .copied()
            .collect();
        album_ids.dedup();
        Ok(album_ids)
    }

    fn genre_ids(&self) -> tempo_core::Result<Vec<GenreId>> {
        Ok(self.genres.clone())
    }

    fn playlist_track_ids(&self, playlist_id: i64) -> tempo_core::Result<Vec<TrackId>> {
        Ok(self.playlists.get(&playlist_id).cloned().unwrap_or_default())
    }

    fn album_track_count(&self, id: AlbumId) -> tempo_core::Result<usize> {
        self.album(id).map(|album| album.tracks.len())
    }

    fn max_popularity(&self) -> tempo_core::Result<u32> {
        Ok(self.max_popularity)
    }

    fn increment_track_popularity(&self, id: TrackId) -> tempo_core::Result<()> {
        *self.track_popularity.borrow_mut().entry(id).or_default() += 1;
        Ok(())
    }

    fn increment_album_popularity(&self, id: AlbumId, amount: u32) -> tempo_core::Result<()> {
        *self.album_popularity.borrow_mut().entry(id).or_default() += amount;
        Ok(())
    }

    fn set_listened_at(&self, id: TrackId, timestamp: i64) -> tempo_core::Result<()> {
        if self.locked.get() {
            return Err(CoreError::Locked);
        }
        self.listened_at.borrow_mut().push((id, timestamp));
        Ok(())
    }

    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

// ===== Pipelines =====

/// Everything a fake pipeline was told
#[derive(Debug, Default)]
pub struct PipelineRecord {
    pub uri: Option<String>,
    pub uris: Vec<String>,
    pub state: PipelineState,
    pub volume: f64,
    pub fade_level: f64,
    pub position: Option<Duration>,
    pub seeks: Vec<Duration>,
    pub output: Option<String>,
}

pub type SharedRecord = Rc<RefCell<PipelineRecord>>;

pub struct FakePipeline {
    record: SharedRecord,
}

impl Pipeline for FakePipeline {
    fn set_uri(&mut self, uri: &str) -> tempo_playback::Result<()> {
        let mut record = self.record.borrow_mut();
        record.uri = Some(uri.to_string());
        record.uris.push(uri.to_string());
        Ok(())
    }

    fn set_state(&mut self, state: PipelineState) -> tempo_playback::Result<()> {
        self.record.borrow_mut().state = state;
        Ok(())
    }

    fn state(&self) -> PipelineState {
        self.record.borrow().state
    }

    fn set_volume(&mut self, rate: f64) {
        self.record.borrow_mut().volume = rate;
    }

    fn set_fade_level(&mut self, level: f64) {
        self.record.borrow_mut().fade_level = level;
    }

    fn fade_level(&self) -> f64 {
        self.record.borrow().fade_level
    }

    fn position(&self) -> Option<Duration> {
        self.record.borrow().position
    }

    fn seek(&mut self, position: Duration) -> tempo_playback::Result<()> {
        let mut record = self.record.borrow_mut();
        record.seeks.push(position);
        record.position = Some(position);
        Ok(())
    }

    fn set_output(&mut self, device: &str) -> tempo_playback::Result<()> {
        self.record.borrow_mut().output = Some(device.to_string());
        Ok(())
    }
}

/// Handles on the records of every pipeline the backend creates
#[derive(Clone, Default)]
pub struct Pipelines {
    pub primary: SharedRecord,
    pub secondary: SharedRecord,
    pub preview: SharedRecord,
}

impl Pipelines {
    pub fn slot(&self, slot: PipelineSlot) -> &SharedRecord {
        match slot {
            PipelineSlot::Primary => &self.primary,
            PipelineSlot::Secondary => &self.secondary,
        }
    }
}

pub struct FakeBackend {
    pipelines: Pipelines,
}

impl PipelineBackend for FakeBackend {
    fn create(&self, role: PipelineRole) -> tempo_playback::Result<Box<dyn Pipeline>> {
        let record = match role {
            PipelineRole::Playback(slot) => self.pipelines.slot(slot),
            PipelineRole::Preview => &self.pipelines.preview,
        };
        Ok(Box::new(FakePipeline {
            record: Rc::clone(record),
        }))
    }
}

// ===== Scrobblers =====

#[derive(Debug, Clone, PartialEq)]
pub enum ScrobbleCall {
    PlayingNow(Option<TrackId>),
    Listen(Option<TrackId>, i64),
}

pub struct RecordingScrobbler {
    pub available: bool,
    pub calls: Rc<RefCell<Vec<ScrobbleCall>>>,
}

impl Scrobbler for RecordingScrobbler {
    fn is_available(&self) -> bool {
        self.available
    }

    fn playing_now(&self, track: &Track) {
        self.calls
            .borrow_mut()
            .push(ScrobbleCall::PlayingNow(track.id));
    }

    fn listen(&self, track: &Track, started_at: i64) {
        self.calls
            .borrow_mut()
            .push(ScrobbleCall::Listen(track.id, started_at));
    }
}

// ===== Radio =====

/// Parser the test answers by hand
#[derive(Clone, Default)]
pub struct ManualParser {
    pub requests: Rc<RefCell<Vec<(ResolutionToken, String, Sender<RadioMessage>)>>>,
}

impl ManualParser {
    /// Answer request `index` with `entries`, then finish it
    pub fn answer(&self, index: usize, entries: &[&str]) {
        let requests = self.requests.borrow();
        let (token, _, tx) = &requests[index];
        for entry in entries {
            tx.send(RadioMessage::EntryParsed {
                token: *token,
                uri: (*entry).to_string(),
            })
            .unwrap();
        }
        tx.send(RadioMessage::Finished { token: *token }).unwrap();
    }
}

impl PlaylistParser for ManualParser {
    fn parse(
        &self,
        token: ResolutionToken,
        uri: &str,
        tx: Sender<RadioMessage>,
    ) -> tempo_playback::Result<()> {
        self.requests
            .borrow_mut()
            .push((token, uri.to_string(), tx));
        Ok(())
    }
}

pub fn radio(name: &str) -> Track {
    Track::radio(name, format!("http://radio.example/{}.pls", name))
}

// ===== Harness =====

pub struct Harness {
    pub player: Player,
    pub pipelines: Pipelines,
    pub library: Rc<MemoryLibrary>,
    pub scrobbles: Rc<RefCell<Vec<ScrobbleCall>>>,
    pub parser: ManualParser,
}

impl Harness {
    pub fn new(settings: PlayerSettings, library: MemoryLibrary) -> Self {
        init_tracing();

        let pipelines = Pipelines::default();
        let library = Rc::new(library);
        let parser = ManualParser::default();
        let backend = FakeBackend {
            pipelines: pipelines.clone(),
        };

        let mut player = Player::new(
            settings,
            Box::new(backend),
            Rc::clone(&library) as Rc<dyn Library>,
            Box::new(parser.clone()),
        )
        .unwrap();

        let scrobbles = Rc::new(RefCell::new(Vec::new()));
        player.add_scrobbler(Box::new(RecordingScrobbler {
            available: true,
            calls: Rc::clone(&scrobbles),
        }));

        Self {
            player,
            pipelines,
            library,
            scrobbles,
            parser,
        }
    }

    /// Player over albums 1 (4 tracks) and 2 (3 tracks), both in the pool
    pub fn with_two_albums(settings: PlayerSettings) -> Self {
        let albums = vec![album(1, 4), album(2, 3)];
        let mut harness = Self::new(settings, MemoryLibrary::with_albums(albums.clone()));
        harness.player.set_albums(albums);
        harness
    }

    pub fn track(&self, id: TrackId) -> Track {
        self.library.track(id).unwrap()
    }

    pub fn active(&self) -> &SharedRecord {
        self.pipelines.slot(self.player.active_slot())
    }

    /// Load `id` and report its stream start, as a real pipeline would
    pub fn start(&mut self, id: TrackId) {
        let track = self.track(id);
        self.player.load(track);
        self.stream_started();
    }

    pub fn stream_started(&mut self) {
        let slot = self.player.active_slot();
        self.player
            .handle_pipeline_event(slot, tempo_playback::PipelineEvent::StreamStart);
    }

    pub fn send(&mut self, event: tempo_playback::PipelineEvent) {
        let slot = self.player.active_slot();
        self.player.handle_pipeline_event(slot, event);
    }

    /// Tick until every fade ramp finished
    pub fn finish_fades(&mut self) {
        for _ in 0..100 {
            if self.player.active_fades() == 0 {
                return;
            }
            self.player.tick();
        }
        panic!("fades never finished");
    }
}

pub fn crossfade_settings(seconds: u32) -> PlayerSettings {
    PlayerSettings {
        crossfade: true,
        transition_duration: seconds,
        ..PlayerSettings::default()
    }
}
