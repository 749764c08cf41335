//! Domain types

mod album;
pub mod ids;
mod track;

pub use album::Album;
pub use ids::{AlbumId, ArtistId, GenreId, TrackId};
pub use track::Track;
