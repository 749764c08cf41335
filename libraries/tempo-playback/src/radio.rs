//! Radio Playlist Resolution
//!
//! Radio entries point at playlists (`.pls`, `.m3u`, ...) rather than at
//! streams. Parsing may block on the network, so it runs off the event
//! loop and reports back over a channel.
//!
//! ## Architecture
//!
//! ```text
//! Event Loop                       Parser Thread
//!     │                                  │
//!     │  request(track) -> token         │
//!     │─────────────────────────────────>│
//!     │                                  │ parse playlist
//!     │                                  │ (network, 10ms-10s)
//!     │   EntryParsed { token, uri }     │
//!     │<─────────────────────────────────│
//!     │   Finished { token }             │
//!     │<─────────────────────────────────│
//!     │  poll() -> Some((track, play))   │
//! ```
//!
//! Only results carrying the token of the pending request are applied; a
//! newer request (or a non-radio load) makes older results stale.

use crate::error::{PlaybackError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tempo_core::Track;
use tracing::{debug, info, warn};

/// Identifies one resolution request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionToken(u64);

/// Parser output, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioMessage {
    /// One stream URI found in the playlist
    EntryParsed {
        token: ResolutionToken,
        uri: String,
    },
    /// Parsing is over, successfully or not
    Finished { token: ResolutionToken },
}

/// Asynchronous playlist parser
///
/// Implementations must eventually send exactly one
/// [`RadioMessage::Finished`] per call, after any entries.
pub trait PlaylistParser {
    /// Start parsing `uri`, reporting on `tx`
    ///
    /// # Errors
    /// Returns an error if parsing could not be started
    fn parse(&self, token: ResolutionToken, uri: &str, tx: Sender<RadioMessage>) -> Result<()>;
}

type ParseFn = dyn Fn(&str) -> Result<Vec<String>> + Send + Sync;

/// Runs a blocking parse function on a worker thread per request
pub struct ThreadedParser {
    parse: Arc<ParseFn>,
}

impl ThreadedParser {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<String>> + Send + Sync + 'static,
    {
        Self {
            parse: Arc::new(parse),
        }
    }
}

impl PlaylistParser for ThreadedParser {
    fn parse(&self, token: ResolutionToken, uri: &str, tx: Sender<RadioMessage>) -> Result<()> {
        let parse = Arc::clone(&self.parse);
        let uri = uri.to_string();

        thread::Builder::new()
            .name("radio-parser".to_string())
            .spawn(move || {
                match parse(&uri) {
                    Ok(entries) => {
                        for entry in entries {
                            let message = RadioMessage::EntryParsed { token, uri: entry };
                            if tx.send(message).is_err() {
                                debug!("Radio resolver dropped, abandoning {}", uri);
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("Failed to parse radio playlist {}: {}", uri, e),
                }
                // Receiver gone means nobody waits for the result
                let _ = tx.send(RadioMessage::Finished { token });
            })
            .map_err(|e| PlaybackError::Radio(format!("Failed to spawn parser thread: {}", e)))?;
        Ok(())
    }
}

#[derive(Debug)]
struct PendingResolution {
    token: ResolutionToken,
    track: Track,
    play: bool,
    resolved: bool,
}

/// Tracks the single in-flight radio resolution
pub struct RadioResolver {
    parser: Box<dyn PlaylistParser>,
    tx: Sender<RadioMessage>,
    rx: Receiver<RadioMessage>,
    next_token: u64,
    pending: Option<PendingResolution>,
}

impl RadioResolver {
    pub fn new(parser: Box<dyn PlaylistParser>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            parser,
            tx,
            rx,
            next_token: 0,
            pending: None,
        }
    }

    /// Start resolving `track`, replacing any pending request
    ///
    /// When the resolution completes, [`RadioResolver::poll`] hands the
    /// track back with its stream URI and the `play` flag.
    pub fn request(&mut self, track: Track, play: bool) -> Result<ResolutionToken> {
        let token = ResolutionToken(self.next_token);
        self.next_token += 1;

        info!("Resolving radio {}", track.uri);
        self.pending = Some(PendingResolution {
            token,
            track: track.clone(),
            play,
            resolved: false,
        });

        if let Err(e) = self.parser.parse(token, &track.uri, self.tx.clone()) {
            self.pending = None;
            return Err(e);
        }
        Ok(token)
    }

    /// Forget the pending request; its results will be discarded
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Radio resolution of {} superseded", pending.track.uri);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply every message received so far
    ///
    /// Returns the resolved track and its `play` flag once the pending
    /// request completes.
    pub fn poll(&mut self) -> Option<(Track, bool)> {
        let mut completed = None;
        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    if let Some(done) = self.apply(message) {
                        completed = Some(done);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        completed
    }

    /// Apply one parser message
    ///
    /// The first entry for the pending token becomes the stream URI;
    /// later entries are ignored. Messages for any other token are stale.
    pub fn apply(&mut self, message: RadioMessage) -> Option<(Track, bool)> {
        let token = match &message {
            RadioMessage::EntryParsed { token, .. } | RadioMessage::Finished { token } => *token,
        };
        let Some(pending) = self.pending.as_mut().filter(|p| p.token == token) else {
            debug!("Discarding stale radio message {:?}", message);
            return None;
        };

        match message {
            RadioMessage::EntryParsed { uri, .. } => {
                if !pending.resolved {
                    debug!("Radio {} resolved to {}", pending.track.uri, uri);
                    pending.track.set_uri(uri);
                    pending.resolved = true;
                }
                None
            }
            RadioMessage::Finished { .. } => {
                let pending = self.pending.take()?;
                Some((pending.track, pending.play))
            }
        }
    }
}
