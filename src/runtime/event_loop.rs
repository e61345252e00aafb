use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use ratatui_explorer::{FileExplorer, Theme};

use crate::app::App;
use crate::config;
use crate::engine::AudioEngine;
use crate::library;
use crate::ui;

/// Fixed cadence of the elapsed-time counter.
const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// How long to block waiting for input before redrawing.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Repeating one-second tick owned by the event loop. It lives exactly as
/// long as the loop does, so no tick can fire after shutdown.
struct Ticker {
    last: Instant,
}

impl Ticker {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// True once per elapsed second. Catches up one interval per call when
    /// the loop fell slightly behind; after a long stall (suspend, SIGSTOP)
    /// it resyncs to now instead of bursting catch-up ticks, so `elapsed`
    /// cannot race past real playback time.
    fn due(&mut self) -> bool {
        let lag = self.last.elapsed();
        if lag < TICK_INTERVAL {
            return false;
        }
        if lag >= TICK_INTERVAL * 4 {
            self.last = Instant::now();
        } else {
            self.last += TICK_INTERVAL;
        }
        true
    }
}

/// Main terminal event loop: drives the one-second tick, redraws and
/// dispatches keyboard input. Returns `Ok(())` when shutdown is requested.
pub fn run<E: AudioEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = Ticker::new();
    let mut explorer: Option<FileExplorer> = None;

    loop {
        if ticker.due() {
            app.player.tick();
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, explorer.as_ref()))?;

        if event::poll(POLL_TIMEOUT)? {
            let ev = event::read()?;

            // The explorer overlay captures all input while open.
            if explorer.is_some() {
                handle_explorer_event(&ev, app, &settings.library, &mut explorer)?;
                continue;
            }

            if let Event::Key(key) = ev {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, app, &mut explorer)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Input routing for the add-track overlay: Esc cancels, Enter on an audio
/// file adds it, everything else goes to the explorer itself.
fn handle_explorer_event<E: AudioEngine>(
    ev: &Event,
    app: &mut App<E>,
    library_settings: &config::LibrarySettings,
    explorer: &mut Option<FileExplorer>,
) -> std::io::Result<()> {
    let Some(exp) = explorer.as_mut() else {
        return Ok(());
    };

    if let Event::Key(key) = ev {
        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    *explorer = None;
                    return Ok(());
                }
                KeyCode::Enter if !exp.current().is_dir() => {
                    let path = exp.current().path().to_path_buf();
                    if library::is_audio_file(&path, library_settings) {
                        app.add_track(&path);
                    } else {
                        app.error = Some(format!("not an audio file: {}", path.display()));
                    }
                    *explorer = None;
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    exp.handle(ev)
}

fn handle_key<E: AudioEngine>(
    key: KeyEvent,
    app: &mut App<E>,
    explorer: &mut Option<FileExplorer>,
) -> Result<bool, Box<dyn std::error::Error>> {
    // A pending modal error eats the next key press.
    if app.error.is_some() {
        app.dismiss_error();
        return Ok(false);
    }

    if app.lyrics_open {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v')
        ) {
            app.close_lyrics();
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            app.stop();
            return Ok(true);
        }
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Enter => app.select_under_cursor(),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.play(),
        KeyCode::Char('s') => app.stop(),
        KeyCode::Char('v') => app.view_lyrics(),
        KeyCode::Char('a') => {
            *explorer = Some(FileExplorer::with_theme(
                Theme::default().add_default_title(),
            )?);
        }
        _ => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_fires_once_per_interval() {
        let mut ticker = Ticker {
            last: Instant::now() - TICK_INTERVAL,
        };
        assert!(ticker.due());
        assert!(!ticker.due());
    }

    #[test]
    fn ticker_catches_up_when_slightly_behind() {
        let mut ticker = Ticker {
            last: Instant::now() - TICK_INTERVAL * 2,
        };
        assert!(ticker.due());
        assert!(ticker.due());
        assert!(!ticker.due());
    }

    #[test]
    fn ticker_resyncs_after_a_long_stall() {
        let mut ticker = Ticker {
            last: Instant::now() - TICK_INTERVAL * 60,
        };
        // One tick for the stall, then back on a one-second cadence.
        assert!(ticker.due());
        assert!(!ticker.due());
    }
}
