//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, WidgetRef, Wrap,
    },
};
use ratatui_explorer::FileExplorer;

use crate::app::App;
use crate::config::UiSettings;
use crate::cover::CoverArt;
use crate::engine::AudioEngine;
use crate::player::{Session, format_mmss};

const CONTROLS_TEXT: &str = "[j/k] move | [enter] select | [p] play | [s] stop | \
                             [v] lyrics | [a] add track | [q] quit";

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep popups smaller than the area so the list stays visible around them.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state.
///
/// `explorer` is the add-track overlay owned by the event loop; it is drawn
/// on top of everything else while open.
pub fn draw<E: AudioEngine>(
    frame: &mut Frame,
    app: &App<E>,
    ui_settings: &UiSettings,
    explorer: Option<&FileExplorer>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" wurli ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Body: track list on the left, now-playing + cover on the right.
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(34)])
        .split(chunks[1]);

    draw_track_list(frame, app, body[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(body[1]);

    draw_now_playing(frame, app, side[0]);
    if ui_settings.show_cover {
        draw_cover(frame, app.cover.as_ref(), side[1]);
    }

    // Footer
    let footer = Paragraph::new(CONTROLS_TEXT)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    if app.lyrics_open {
        draw_lyrics_popup(frame, app, chunks[1]);
    }

    if let Some(error) = &app.error {
        draw_error_popup(frame, error, chunks[1]);
    }

    if let Some(explorer) = explorer {
        let area = centered_rect_sized(60, 20, chunks[1]);
        frame.render_widget(Clear, area);
        explorer.widget().render_ref(area, frame.buffer_mut());
    }
}

fn draw_track_list<E: AudioEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let items: Vec<ListItem> = app
        .library
        .tracks()
        .iter()
        .map(|t| {
            ListItem::new(format!(
                "{} [{}]",
                t.display,
                format_mmss(t.duration.as_secs())
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if app.has_tracks() {
        state.select(Some(app.cursor.min(app.library.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing<E: AudioEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let song_line = match app.player.session() {
        Session::Idle => "No track selected".to_string(),
        Session::Selected { track } => match app.library.track_at(track) {
            Ok(t) => format!("Selected: {}", t.display),
            Err(_) => "No track selected".to_string(),
        },
        Session::Playing { track, .. } => match app.library.track_at(track) {
            Ok(t) => format!("Playing: {}", t.display),
            Err(_) => "No track selected".to_string(),
        },
        Session::Stopped { .. } => "No track playing".to_string(),
    };

    let text = format!(
        "{}\nDuration: {}\nElapsed: {}",
        song_line,
        app.player.duration_text(&app.library),
        app.player.elapsed_text()
    );

    let block = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" now playing ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(block, area);
}

/// Paint the cover thumbnail with upper-half-block cells: each text row
/// carries two pixel rows (foreground on top, background below).
fn draw_cover(frame: &mut Frame, cover: Option<&CoverArt>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" cover ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(cover) = cover else {
        let placeholder = Paragraph::new("No Cover").alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    };

    let width = cover.width().min(inner.width as u32);
    let rows = cover.height().min(inner.height as u32 * 2);

    let mut lines: Vec<Line> = Vec::new();
    let mut y = 0;
    while y < rows {
        let mut spans: Vec<Span> = Vec::with_capacity(width as usize);
        for x in 0..width {
            let (tr, tg, tb) = cover.pixel(x, y);
            let (br, bg, bb) = if y + 1 < cover.height() {
                cover.pixel(x, y + 1)
            } else {
                (0, 0, 0)
            };
            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(tr, tg, tb))
                    .bg(Color::Rgb(br, bg, bb)),
            ));
        }
        lines.push(Line::from(spans));
        y += 2;
    }

    let art = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(art, inner);
}

fn draw_lyrics_popup<E: AudioEngine>(frame: &mut Frame, app: &App<E>, area: Rect) {
    let (title, text) = match app
        .player
        .current_track()
        .and_then(|i| app.library.track_at(i).ok())
    {
        Some(track) => (
            format!(" lyrics - {} ", track.title),
            track.lyrics.clone(),
        ),
        None => (" lyrics ".to_string(), "No track selected".to_string()),
    };

    let popup_area = centered_rect_sized(area.width.saturating_sub(10), 14, area);
    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

fn draw_error_popup(frame: &mut Frame, error: &str, area: Rect) {
    let popup_area = centered_rect_sized(50, 7, area);
    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(error.to_string())
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" error (any key closes) ")
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}
