//! The rodio-backed engine.
//!
//! Owns the output stream for the lifetime of the application and at most
//! one `Sink` for the current track. Durations come from lofty's audio
//! properties rather than from decoding the whole file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::{AudioEngine, EngineError};

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
}

impl RodioEngine {
    /// Open the default output device. The stream is acquired once at
    /// startup and released when the engine is dropped; nothing else in the
    /// application touches the mixer directly.
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self { stream, sink: None })
    }
}

pub(super) fn probe_duration(path: &Path) -> Result<Duration, EngineError> {
    let tagged = lofty::read_from_path(path)
        .map_err(|_| EngineError::Duration(path.to_path_buf()))?;
    Ok(tagged.properties().duration())
}

impl AudioEngine for RodioEngine {
    fn measure_duration(&self, path: &Path) -> Result<Duration, EngineError> {
        probe_duration(path)
    }

    fn play(&mut self, path: &Path) -> Result<(), EngineError> {
        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|source| EngineError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        // Replace whatever was playing before.
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
