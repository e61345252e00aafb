//! Startup and shutdown: terminal bracketing, settings, library preload.

use std::env;
use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::engine::RodioEngine;
use crate::library::scan;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    crate::logging::init();
    let settings = settings::load_settings();

    let engine = RodioEngine::new()?;
    let mut app = App::new(engine);

    // Optional start directory: preload every audio file under it.
    if let Some(dir) = env::args().nth(1) {
        for path in scan(Path::new(&dir), &settings.library) {
            app.add_track(&path);
        }
        info!("preloaded {} tracks from {dir}", app.library.len());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
