//! Tempo Core
//!
//! Domain types and collaborator contracts shared by the Tempo player crates.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album` and the sentinel ids for pseudo-tracks
//! - **Collaborator Traits**: `Library` (track/album store) and `Scrobbler`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tempo_core::types::{Album, Track};
//! use std::time::Duration;
//!
//! let album = Album::new(7, "Blue Train").with_tracks(vec![
//!     Track::new(70, "file:///music/blue_train.flac").with_duration(Duration::from_secs(643)),
//!     Track::new(71, "file:///music/moments_notice.flac"),
//! ]);
//!
//! assert_eq!(album.tracks[1].position, 1);
//! assert_eq!(album.tracks[1].album_id, Some(7));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{Library, Scrobbler};
pub use types::{ids, Album, AlbumId, ArtistId, GenreId, Track, TrackId};
