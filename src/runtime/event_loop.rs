use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode, Pane};
use crate::config;
use crate::error::SessionError;
use crate::runtime::fetcher::Fetcher;
use crate::session::{Notice, Session};
use crate::transport::Transport;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: handles input, UI drawing and the exchange with
/// the fetch worker and the transport. Returns `Ok(())` when shutdown is
/// requested.
pub fn run<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<T>,
    fetcher: &Fetcher,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        pump(app, session, fetcher);

        terminal.draw(|f| ui::draw(f, app, session, &settings.ui, &settings.playback))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, session, state) {
                    break;
                }
            }
        }
    }

    session.pause();
    Ok(())
}

/// One round of background work: hand queued requests to the worker, apply
/// finished fetches, advance the transport and surface notices.
fn pump<T: Transport>(app: &mut App, session: &mut Session<T>, fetcher: &Fetcher) {
    for request in session.take_requests() {
        fetcher.submit(request);
    }
    for outcome in fetcher.drain() {
        if !session.apply_outcome(outcome) {
            log::debug!("discarded stale catalog result");
        }
    }
    session.poll_transport();
    for notice in session.take_notices() {
        app.show_notice(notice);
    }
    app.clamp_cursors(session);
}

/// Show a failed operation in the status bar.
fn report(app: &mut App, result: Result<(), SessionError>) {
    if let Err(e) = result {
        log::info!("{e}");
        app.show_notice(Notice::from(e));
    }
}

fn focused_len<T: Transport>(app: &App, session: &Session<T>) -> usize {
    match app.focus {
        Pane::Library => app.library(session).len(),
        Pane::Queue => session.queue().len(),
        Pane::Playlist => session
            .playlists()
            .get(app.playlist_index)
            .map(|p| p.tracks.len())
            .unwrap_or(0),
    }
}

fn handle_input_key<T: Transport>(key: KeyEvent, app: &mut App, session: &mut Session<T>) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Enter => {
            let (mode, text) = app.submit_input();
            match mode {
                InputMode::Search => {
                    if text.trim().is_empty() {
                        session.clear_search();
                        app.show_catalog();
                    } else {
                        session.begin_search(&text);
                        app.show_results(&text);
                    }
                }
                InputMode::NewPlaylist => match session.create_playlist(&text) {
                    Ok(_) => {
                        app.playlist_index = session.playlists().len().saturating_sub(1);
                        app.playlist_cursor = 0;
                        app.show_notice(Notice::info(format!("Created playlist '{}'", text.trim())));
                    }
                    Err(e) => report(app, Err(e)),
                },
                InputMode::RenamePlaylist => {
                    if let Some(id) = app.selected_playlist_id(session) {
                        report(app, session.rename_playlist(&id, &text));
                    }
                }
                InputMode::Normal => {}
            }
        }
        KeyCode::Char(c) if !c.is_control() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_input_char(c)
        }
        _ => {}
    }
}

/// Handle one key press. Returns `true` when the user asked to quit.
fn handle_key_event<T: Transport>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session<T>,
    state: &mut EventLoopState,
) -> bool {
    if app.input_mode != InputMode::Normal {
        state.pending_gg = false;
        handle_input_key(key, app, session);
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,

        KeyCode::Char('j') | KeyCode::Down => {
            let len = focused_len(app, session);
            app.next(len);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let len = focused_len(app, session);
            app.prev(len);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            let len = focused_len(app, session);
            app.last(len);
        }
        KeyCode::Tab => app.cycle_focus(),

        KeyCode::Enter => {
            let result = match app.focus {
                Pane::Library => match app.focused_track(session).map(|t| t.id.clone()) {
                    Some(id) => session.play_by_id(&id),
                    None => Ok(()),
                },
                Pane::Queue if session.queue().is_empty() => Ok(()),
                Pane::Queue => session.play_queued(app.queue_cursor),
                Pane::Playlist => match app.selected_playlist_id(session) {
                    Some(id) => session.play_playlist(&id, app.playlist_cursor),
                    None => Ok(()),
                },
            };
            report(app, result);
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let result = session.toggle_playback();
            report(app, result);
        }
        KeyCode::Char('l') => {
            let result = session.next();
            report(app, result);
        }
        KeyCode::Char('h') => {
            let result = session.previous();
            report(app, result);
        }
        KeyCode::Char('L') => {
            let target = session.progress() + settings.playback.seek_seconds as f64;
            session.seek(target);
        }
        KeyCode::Char('H') => {
            let target = session.progress() - settings.playback.seek_seconds as f64;
            session.seek(target.max(0.0));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let result = session.set_volume(session.volume() + settings.playback.volume_step);
            report(app, result);
        }
        KeyCode::Char('-') => {
            let result = session.set_volume(session.volume() - settings.playback.volume_step);
            report(app, result);
        }

        KeyCode::Char('/') => app.begin_input(InputMode::Search, ""),
        KeyCode::Esc => {
            if app.metadata_window {
                app.toggle_metadata_window();
            } else if app.showing_results {
                session.clear_search();
                app.show_catalog();
            }
        }
        KeyCode::Char('A') => {
            match app.focused_track(session).and_then(|t| t.artist_ref()) {
                Some(artist) => {
                    session.browse_artist(&artist.id);
                    app.show_results(&artist.name);
                }
                None => app.show_notice(Notice::info("No artist information for this track")),
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = app.focused_track(session).map(|t| t.id.clone()) {
                let result = session.enqueue(&id);
                report(app, result);
            }
        }
        KeyCode::Char('C') => session.clear_queue(),

        KeyCode::Char('c') => app.begin_input(InputMode::NewPlaylist, ""),
        KeyCode::Char('R') => {
            let name = session
                .playlists()
                .get(app.playlist_index)
                .map(|p| p.name.clone());
            match name {
                Some(name) => app.begin_input(InputMode::RenamePlaylist, &name),
                None => app.show_notice(Notice::info("No playlist selected")),
            }
        }
        KeyCode::Char('X') => {
            if let Some(id) = app.selected_playlist_id(session) {
                let result = session.delete_playlist(&id);
                report(app, result);
            }
        }
        KeyCode::Char('a') => {
            let track_id = app.focused_track(session).map(|t| t.id.clone());
            match (app.selected_playlist_id(session), track_id) {
                (Some(playlist_id), Some(track_id)) => {
                    let result = session.add_to_playlist(&playlist_id, &track_id);
                    report(app, result);
                }
                (None, _) => app.show_notice(Notice::info("Create a playlist first (c)")),
                _ => {}
            }
        }
        KeyCode::Char('d') if app.focus == Pane::Playlist => {
            let track_id = app.focused_track(session).map(|t| t.id.clone());
            if let (Some(playlist_id), Some(track_id)) =
                (app.selected_playlist_id(session), track_id)
            {
                let result = session.remove_from_playlist(&playlist_id, &track_id);
                report(app, result);
            }
        }
        KeyCode::Char(']') => app.next_playlist(session.playlists().len()),
        KeyCode::Char('[') => app.prev_playlist(session.playlists().len()),

        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}
