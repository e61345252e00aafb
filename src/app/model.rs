use std::path::Path;

use tracing::{info, warn};

use crate::cover::CoverArt;
use crate::engine::AudioEngine;
use crate::library::{Library, TrackMeta};
use crate::player::Player;

/// The main application model: library, playback session and the bits of
/// UI state the renderer needs.
pub struct App<E: AudioEngine> {
    pub library: Library,
    pub player: Player<E>,

    /// List cursor. Independent from the player's current track until the
    /// user confirms the selection.
    pub cursor: usize,

    /// Pending modal error text; any key dismisses it.
    pub error: Option<String>,
    /// Whether the lyrics panel is open.
    pub lyrics_open: bool,
    /// Cover art for the current track, decoded once per selection.
    pub cover: Option<CoverArt>,
}

impl<E: AudioEngine> App<E> {
    /// Create an empty app owning `engine` through the player.
    pub fn new(engine: E) -> Self {
        Self {
            library: Library::new(),
            player: Player::new(engine),
            cursor: 0,
            error: None,
            lyrics_open: false,
            cover: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.library.is_empty()
    }

    /// Move the list cursor down, clamped to the last track.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.library.len() {
            self.cursor += 1;
        }
    }

    /// Move the list cursor up, clamped to the first track.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Add the audio file at `path` to the library, reading its tags.
    pub fn add_track(&mut self, path: &Path) {
        let meta = TrackMeta::from_path(path);
        let track = self.library.add_track(self.player.engine(), meta);
        info!("added {}", track.display);
    }

    /// Confirm the cursor as the current track. Refreshes the duration
    /// display (derived from the session) and the cover art.
    pub fn select_under_cursor(&mut self) {
        if !self.has_tracks() {
            return;
        }
        self.player.select(self.cursor);
        self.refresh_cover();
    }

    /// Play the current track; failures become a modal error for the user
    /// to dismiss and retry.
    pub fn play(&mut self) {
        match self.player.play(&self.library) {
            Ok(()) => self.refresh_cover(),
            Err(e) => {
                warn!("play failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Stop playback. Never fails, even with nothing playing.
    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Open the lyrics panel for the current track.
    pub fn view_lyrics(&mut self) {
        match self.player.lyrics(&self.library) {
            Ok(_) => self.lyrics_open = true,
            Err(e) => {
                warn!("lyrics unavailable: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn close_lyrics(&mut self) {
        self.lyrics_open = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Reload the cover for the current track, falling back to no cover on
    /// any decode failure.
    fn refresh_cover(&mut self) {
        let cover_path = self
            .player
            .current_track()
            .and_then(|i| self.library.track_at(i).ok())
            .and_then(|t| t.cover.clone());
        self.cover = cover_path.and_then(|p| CoverArt::load(&p));
    }
}
