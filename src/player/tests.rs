use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use tempfile::{tempdir, TempDir};

use super::*;
use crate::library::{Library, TrackMeta};

/// Shared observable state for the fake engine, so tests keep a handle
/// after the player takes ownership of the engine itself.
#[derive(Default)]
struct FakeState {
    busy: Cell<bool>,
    fail_play: Cell<bool>,
    fail_duration: Cell<bool>,
    plays: RefCell<Vec<PathBuf>>,
    stops: Cell<usize>,
}

#[derive(Default)]
struct FakeEngine(Rc<FakeState>);

impl AudioEngine for FakeEngine {
    fn measure_duration(&self, path: &Path) -> Result<Duration, EngineError> {
        if self.0.fail_duration.get() {
            Err(EngineError::Duration(path.to_path_buf()))
        } else {
            Ok(Duration::from_secs(125))
        }
    }

    fn play(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.0.fail_play.get() {
            return Err(EngineError::NoOutputDevice("fake device gone".to_string()));
        }
        self.0.plays.borrow_mut().push(path.to_path_buf());
        self.0.busy.set(true);
        Ok(())
    }

    fn stop(&mut self) {
        self.0.stops.set(self.0.stops.get() + 1);
        self.0.busy.set(false);
    }

    fn is_busy(&self) -> bool {
        self.0.busy.get()
    }
}

/// A player plus a library with `n` tracks backed by real (empty) files.
fn player_with_tracks(n: usize) -> (Player<FakeEngine>, Library, Rc<FakeState>, TempDir) {
    let state = Rc::new(FakeState::default());
    let engine = FakeEngine(state.clone());

    let dir = tempdir().unwrap();
    let mut library = Library::new();
    for i in 0..n {
        let path = dir.path().join(format!("track-{i}.mp3"));
        fs::write(&path, b"").unwrap();
        library.add_track(&engine, TrackMeta::new(path));
    }

    (Player::new(engine), library, state, dir)
}

#[test]
fn play_without_selection_fails_and_stays_idle() {
    let (mut player, library, state, _dir) = player_with_tracks(1);

    match player.play(&library) {
        Err(PlayerError::NoTrackSelected) => {}
        other => panic!("expected NoTrackSelected, got {other:?}"),
    }

    assert_eq!(player.session(), Session::Idle);
    assert_eq!(player.elapsed_text(), TIME_PLACEHOLDER);
    assert!(state.plays.borrow().is_empty());
}

#[test]
fn play_missing_file_fails_before_reaching_the_engine() {
    let state = Rc::new(FakeState::default());
    let engine = FakeEngine(state.clone());

    let mut library = Library::new();
    library.add_track(&engine, TrackMeta::new(PathBuf::from("/nonexistent/gone.mp3")));

    let mut player = Player::new(engine);
    player.select(0);

    match player.play(&library) {
        Err(PlayerError::FileNotFound(p)) => {
            assert_eq!(p, PathBuf::from("/nonexistent/gone.mp3"));
        }
        other => panic!("expected FileNotFound, got {other:?}"),
    }

    assert_eq!(player.session(), Session::Selected { track: 0 });
    assert!(state.plays.borrow().is_empty());
}

#[test]
fn play_resets_elapsed_and_ticks_count_seconds() {
    let (mut player, library, state, _dir) = player_with_tracks(1);
    player.select(0);
    player.play(&library).unwrap();

    assert_eq!(
        player.session(),
        Session::Playing {
            track: 0,
            elapsed: 0
        }
    );
    assert_eq!(player.elapsed_text(), "00:00");

    for _ in 0..3 {
        player.tick();
    }
    assert_eq!(
        player.session(),
        Session::Playing {
            track: 0,
            elapsed: 3
        }
    );
    assert_eq!(player.elapsed_text(), "00:03");

    // Track finishes on its own: the displays reset instead of freezing.
    state.busy.set(false);
    player.tick();
    assert_eq!(player.session(), Session::Stopped { track: 0 });
    assert_eq!(player.elapsed_text(), TIME_PLACEHOLDER);
    assert_eq!(player.duration_text(&library), TIME_PLACEHOLDER);

    player.tick();
    assert_eq!(player.session(), Session::Stopped { track: 0 });
}

#[test]
fn replaying_resets_the_counter() {
    let (mut player, library, _state, _dir) = player_with_tracks(1);
    player.select(0);
    player.play(&library).unwrap();
    player.tick();
    player.tick();

    player.play(&library).unwrap();
    assert_eq!(
        player.session(),
        Session::Playing {
            track: 0,
            elapsed: 0
        }
    );
}

#[test]
fn ticks_while_idle_or_selected_are_noops() {
    let (mut player, _library, _state, _dir) = player_with_tracks(1);

    player.tick();
    assert_eq!(player.session(), Session::Idle);

    player.select(0);
    player.tick();
    assert_eq!(player.session(), Session::Selected { track: 0 });
}

#[test]
fn stop_is_idempotent() {
    let (mut player, library, state, _dir) = player_with_tracks(1);
    player.select(0);
    player.play(&library).unwrap();

    player.stop();
    let after_first = (
        player.session(),
        player.elapsed_text(),
        player.duration_text(&library),
    );

    player.stop();
    let after_second = (
        player.session(),
        player.elapsed_text(),
        player.duration_text(&library),
    );

    assert_eq!(after_first, after_second);
    assert_eq!(player.session(), Session::Stopped { track: 0 });
    assert_eq!(player.elapsed_text(), TIME_PLACEHOLDER);
    assert_eq!(state.stops.get(), 2);

    // The track is still current: play restarts it without re-selecting.
    player.play(&library).unwrap();
    assert_eq!(
        player.session(),
        Session::Playing {
            track: 0,
            elapsed: 0
        }
    );
}

#[test]
fn stop_reverts_the_duration_display_to_the_placeholder() {
    let (mut player, library, _state, _dir) = player_with_tracks(1);
    player.select(0);
    assert_eq!(player.duration_text(&library), "02:05");
    player.play(&library).unwrap();
    player.tick();

    player.stop();
    assert_eq!(player.session(), Session::Stopped { track: 0 });
    assert_eq!(player.duration_text(&library), TIME_PLACEHOLDER);
    assert_eq!(player.elapsed_text(), TIME_PLACEHOLDER);

    // Re-selecting brings the duration display back.
    player.select(0);
    assert_eq!(player.duration_text(&library), "02:05");
}

#[test]
fn stop_before_any_selection_stays_idle() {
    let (mut player, _library, _state, _dir) = player_with_tracks(1);
    player.stop();
    assert_eq!(player.session(), Session::Idle);
}

#[test]
fn selecting_during_playback_does_not_stop_audio() {
    let (mut player, library, state, _dir) = player_with_tracks(2);
    player.select(0);
    player.play(&library).unwrap();

    player.select(1);
    assert_eq!(player.session(), Session::Selected { track: 1 });
    assert_eq!(state.stops.get(), 0);
    assert!(state.busy.get());

    // Not playing as far as the session is concerned: no counting.
    player.tick();
    assert_eq!(player.session(), Session::Selected { track: 1 });
}

#[test]
fn engine_failure_surfaces_and_leaves_track_selected() {
    let (mut player, library, state, _dir) = player_with_tracks(1);
    state.fail_play.set(true);

    player.select(0);
    match player.play(&library) {
        Err(PlayerError::Playback(_)) => {}
        other => panic!("expected Playback error, got {other:?}"),
    }

    assert_eq!(player.session(), Session::Selected { track: 0 });
    assert_eq!(player.elapsed_text(), TIME_PLACEHOLDER);
}

#[test]
fn lyrics_require_a_selection() {
    let (mut player, library, _state, _dir) = player_with_tracks(1);

    match player.lyrics(&library) {
        Err(PlayerError::NoTrackSelected) => {}
        other => panic!("expected NoTrackSelected, got {other:?}"),
    }

    player.select(0);
    // Untagged file: the placeholder is stored on the track itself.
    assert_eq!(player.lyrics(&library).unwrap(), "No lyrics available");
}

#[test]
fn duration_text_follows_the_selection() {
    let (mut player, library, _state, _dir) = player_with_tracks(1);

    assert_eq!(player.duration_text(&library), TIME_PLACEHOLDER);
    player.select(0);
    assert_eq!(player.duration_text(&library), "02:05");
}

#[test]
fn failed_duration_measurement_displays_as_zero() {
    let state = Rc::new(FakeState::default());
    state.fail_duration.set(true);
    let engine = FakeEngine(state.clone());

    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    fs::write(&path, b"").unwrap();

    let mut library = Library::new();
    library.add_track(&engine, TrackMeta::new(path));
    assert_eq!(library.track_at(0).unwrap().duration, Duration::ZERO);

    let mut player = Player::new(engine);
    player.select(0);
    assert_eq!(player.duration_text(&library), "00:00");
}

#[test]
fn format_mmss_pads_and_does_not_clamp_minutes() {
    assert_eq!(format_mmss(0), "00:00");
    assert_eq!(format_mmss(59), "00:59");
    assert_eq!(format_mmss(125), "02:05");
    assert_eq!(format_mmss(3661), "61:01");
}
