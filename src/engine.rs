//! Audio engine seam.
//!
//! The playback controller talks to audio hardware only through the
//! `AudioEngine` trait, so the whole session state machine can be exercised
//! in tests without an output device. `RodioEngine` is the production
//! implementation.

mod output;

pub use output::RodioEngine;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
    #[error("could not measure duration of {0}")]
    Duration(PathBuf),
}

/// Capability for decoding/playing audio and reporting duration and busy
/// state.
pub trait AudioEngine {
    /// Measure the total duration of the audio file at `path`.
    fn measure_duration(&self, path: &Path) -> Result<Duration, EngineError>;
    /// Load `path` and start playing it, replacing whatever was playing.
    fn play(&mut self, path: &Path) -> Result<(), EngineError>;
    /// Stop playback. Safe to call with nothing playing.
    fn stop(&mut self);
    /// Whether the engine is still producing audio.
    fn is_busy(&self) -> bool;
}
