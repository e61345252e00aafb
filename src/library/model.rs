use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::engine::AudioEngine;

use super::meta::TrackMeta;

/// Artist used when the file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Lyrics used when the file carries no lyrics tag.
const NO_LYRICS: &str = "No lyrics available";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("track index {index} out of range (library has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One playable audio item and its metadata.
///
/// `duration` is measured exactly once, when the track is added, and is
/// never refreshed even if the file changes on disk afterwards.
#[derive(Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub cover: Option<PathBuf>,
    pub lyrics: String,
    pub duration: Duration,
    pub display: String,
}

fn make_display(title: &str, artist: &str) -> String {
    let artist = artist.trim();
    if artist.is_empty() || artist == UNKNOWN_ARTIST {
        title.to_string()
    } else {
        format!("{} - {}", artist, title)
    }
}

/// Insertion-ordered collection of all tracks known to the session.
#[derive(Default)]
pub struct Library {
    tracks: Vec<Track>,
}

impl Library {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Add a track described by `meta`, measuring its duration through
    /// `engine`. Never fails: an unreadable file gets a zero duration and a
    /// diagnostic in the log.
    pub fn add_track(&mut self, engine: &dyn AudioEngine, meta: TrackMeta) -> &Track {
        let duration = match engine.measure_duration(&meta.path) {
            Ok(d) => d,
            Err(e) => {
                warn!("duration unavailable for {}: {e}", meta.path.display());
                Duration::ZERO
            }
        };

        let TrackMeta {
            path,
            title,
            artist,
            cover,
            lyrics,
        } = meta;
        let artist = artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let lyrics = lyrics.unwrap_or_else(|| NO_LYRICS.to_string());
        let display = make_display(&title, &artist);

        self.tracks.push(Track {
            path,
            title,
            artist,
            cover,
            lyrics,
            duration,
            display,
        });
        // Just pushed, so the vec cannot be empty.
        &self.tracks[self.tracks.len() - 1]
    }

    /// Look up a track by insertion index. Out-of-range indices cannot come
    /// from list selection, but the API stays total anyway.
    pub fn track_at(&self, index: usize) -> Result<&Track, LibraryError> {
        self.tracks.get(index).ok_or(LibraryError::IndexOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
