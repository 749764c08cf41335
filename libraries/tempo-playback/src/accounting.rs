//! End-of-track accounting: scrobbling and popularity
//!
//! Runs for the finishing track whenever playback advances on its own
//! (gapless hand-over or crossfade), never on explicit loads.

use std::time::Duration;
use tempo_core::{Library, Scrobbler, Track};
use tracing::{debug, warn};

/// Tracks shorter than this are never scrobbled
pub const MIN_SCROBBLE_DURATION: Duration = Duration::from_secs(30);

/// Play time that makes any long enough track eligible
pub const SCROBBLE_PLAYED_CAP: Duration = Duration::from_secs(240);

/// True if a track of `duration`, played for `played`, may be scrobbled
///
/// The track must last at least 30 seconds and have been played for half
/// its duration or four minutes, whichever comes first.
pub fn scrobble_eligible(duration: Duration, played: Duration) -> bool {
    if duration < MIN_SCROBBLE_DURATION {
        return false;
    }
    played >= duration / 2 || played >= SCROBBLE_PLAYED_CAP
}

/// Popularity added to the album of a finished track
///
/// Party mode adds a flat 1. Otherwise the increment is scaled so that
/// playing a whole album counts like the most popular one:
/// `round(max_popularity / track_count)`, or 1 for an empty album.
pub fn popularity_increment(party: bool, max_popularity: u32, track_count: usize) -> u32 {
    if party || track_count == 0 {
        return 1;
    }
    (f64::from(max_popularity) / track_count as f64).round() as u32
}

/// Account for `track` finishing: scrobble it and bump its popularity
///
/// `started_at` and `now` are unix timestamps in seconds. Library writes are
/// skipped while the library is locked and for tracks not in the library.
pub fn finish_track(
    library: &dyn Library,
    scrobblers: &[Box<dyn Scrobbler>],
    track: &Track,
    started_at: i64,
    now: i64,
    party: bool,
) {
    if track.is_none() {
        return;
    }

    let played = Duration::from_secs(u64::try_from(now - started_at).unwrap_or(0));
    if scrobble_eligible(track.duration, played) {
        for scrobbler in scrobblers.iter().filter(|s| s.is_available()) {
            scrobbler.listen(track, started_at);
        }
    }

    if library.is_locked() || !track.is_catalogued() {
        return;
    }
    let Some(track_id) = track.id else {
        return;
    };
    if let Err(e) = library.increment_track_popularity(track_id) {
        warn!("Failed to update popularity of track {}: {}", track_id, e);
    }

    let Some(album_id) = track.album_id else {
        return;
    };
    let track_count = library.album_track_count(album_id).unwrap_or_else(|e| {
        debug!("No track count for album {}: {}", album_id, e);
        0
    });
    let max_popularity = if party {
        0
    } else {
        library.max_popularity().unwrap_or_else(|e| {
            debug!("No max popularity: {}", e);
            0
        })
    };
    let amount = popularity_increment(party, max_popularity, track_count);
    if let Err(e) = library.increment_album_popularity(album_id, amount) {
        warn!("Failed to update popularity of album {}: {}", album_id, e);
    }
}
