//! Track records and the in-memory library.
//!
//! A `Track` is immutable once added. The `Library` is an append-only,
//! insertion-ordered collection; indices handed to the UI stay valid for
//! the life of the process.

mod meta;
mod model;
mod scan;

pub use meta::TrackMeta;
pub use model::{Library, LibraryError, Track, UNKNOWN_ARTIST};
pub use scan::{is_audio_file, scan};
