//! Identifier aliases and sentinel ids
//!
//! Catalogued rows always carry a non-negative id. Negative values are
//! reserved for pseudo-entities (radio streams, external files, smart
//! playlists) and never resolve through the [`Library`](crate::Library).

/// Track identifier
pub type TrackId = i64;

/// Album identifier
pub type AlbumId = i64;

/// Artist identifier
pub type ArtistId = i64;

/// Genre identifier
pub type GenreId = i64;

/// No entity
pub const NONE: i64 = -1;

/// "Popular tracks" smart genre, valid as a party filter
pub const POPULARS: i64 = -2;

/// "Recently added" smart genre, valid as a party filter
pub const RECENTS: i64 = -4;

/// Internet radio stream pseudo-track
pub const RADIOS: i64 = -6;

/// File played from outside the library
pub const EXTERNALS: i64 = -7;

/// Playlist whose tracks are never picked in party mode
pub const NOPARTY: i64 = -9;

/// Artist id marking an album as a compilation
pub const COMPILATIONS: i64 = -2001;

/// True if `id` denotes a catalogued row rather than a sentinel
pub fn is_catalogued(id: i64) -> bool {
    id >= 0
}
