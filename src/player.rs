//! Playback controller: the single-track session state machine.
//!
//! The session is a tagged variant (`Idle | Selected | Playing`) so that
//! illegal operations are no-ops by construction: there is no elapsed
//! counter to tick unless a track is actually playing, and no current track
//! to play unless one was selected.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::engine::{AudioEngine, EngineError};
use crate::library::{Library, LibraryError};

/// Shown for the duration/elapsed displays when there is nothing to show.
pub const TIME_PLACEHOLDER: &str = "--:--";

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no track selected")]
    NoTrackSelected,
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to play track: {0}")]
    Playback(#[from] EngineError),
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Playback session state. At most one session exists, with a single
/// replaceable current-track slot; tracks are referenced by library index
/// (the library is append-only, so indices are stable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// No track has ever been selected.
    Idle,
    /// A track is selected but not playing.
    Selected { track: usize },
    /// A track is playing; `elapsed` counts whole seconds since `play`.
    Playing { track: usize, elapsed: u64 },
    /// Playback was stopped (or the track finished). The track stays
    /// current so `play` can restart it, but the time displays show
    /// placeholders until the next select or play.
    Stopped { track: usize },
}

pub struct Player<E: AudioEngine> {
    engine: E,
    session: Session,
}

impl<E: AudioEngine> Player<E> {
    /// Take ownership of the audio engine for the lifetime of the session.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            session: Session::Idle,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Library index of the current track, if any.
    pub fn current_track(&self) -> Option<usize> {
        match self.session {
            Session::Idle => None,
            Session::Selected { track }
            | Session::Playing { track, .. }
            | Session::Stopped { track } => Some(track),
        }
    }

    /// Make `track` the current track. Never interrupts audio that is
    /// already playing; the running sink is only replaced on the next
    /// `play`.
    pub fn select(&mut self, track: usize) {
        self.session = Session::Selected { track };
    }

    /// Start playing the current track from the beginning.
    ///
    /// The track's file must still exist on disk; a vanished file is
    /// reported without ever reaching the engine. Engine failures leave the
    /// track selected so the user can retry.
    pub fn play(&mut self, library: &Library) -> Result<(), PlayerError> {
        let index = self.current_track().ok_or(PlayerError::NoTrackSelected)?;
        let track = library.track_at(index)?;

        if !track.path.exists() {
            return Err(PlayerError::FileNotFound(track.path.clone()));
        }

        if let Err(e) = self.engine.play(&track.path) {
            self.session = Session::Selected { track: index };
            return Err(PlayerError::Playback(e));
        }

        info!("playing {}", track.display);
        self.session = Session::Playing {
            track: index,
            elapsed: 0,
        };
        Ok(())
    }

    /// Stop playback and revert the elapsed and duration displays to their
    /// placeholders. The current track stays current so `play` can restart
    /// it. Idempotent.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.session = match self.session {
            Session::Idle => Session::Idle,
            Session::Selected { track }
            | Session::Playing { track, .. }
            | Session::Stopped { track } => Session::Stopped { track },
        };
    }

    /// One-second cadence, driven by the runtime loop.
    ///
    /// Advances the elapsed counter while the engine is audibly busy. When
    /// the engine has gone idle under us the track finished on its own, so
    /// the session falls back to `Stopped` and the displays reset, exactly
    /// as after `stop`.
    pub fn tick(&mut self) {
        if let Session::Playing { track, elapsed } = self.session {
            if self.engine.is_busy() {
                self.session = Session::Playing {
                    track,
                    elapsed: elapsed + 1,
                };
            } else {
                info!("track finished");
                self.session = Session::Stopped { track };
            }
        }
    }

    /// Lyrics of the current track.
    pub fn lyrics<'a>(&self, library: &'a Library) -> Result<&'a str, PlayerError> {
        let index = self.current_track().ok_or(PlayerError::NoTrackSelected)?;
        Ok(library.track_at(index)?.lyrics.as_str())
    }

    /// Elapsed-time text for the status display.
    pub fn elapsed_text(&self) -> String {
        match self.session {
            Session::Playing { elapsed, .. } => format_mmss(elapsed),
            _ => TIME_PLACEHOLDER.to_string(),
        }
    }

    /// Duration text for the selected or playing track. Idle and stopped
    /// sessions show the placeholder.
    pub fn duration_text(&self, library: &Library) -> String {
        let track = match self.session {
            Session::Selected { track } | Session::Playing { track, .. } => track,
            Session::Idle | Session::Stopped { .. } => return TIME_PLACEHOLDER.to_string(),
        };
        match library.track_at(track) {
            Ok(t) => format_mmss(t.duration.as_secs()),
            Err(_) => TIME_PLACEHOLDER.to_string(),
        }
    }
}

/// Format whole seconds as zero-padded `MM:SS`. Minutes are not clamped to
/// an hour: 3661 seconds renders as `61:01`.
pub fn format_mmss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests;
