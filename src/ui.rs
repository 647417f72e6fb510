//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, InputMode, Pane};
use crate::config::{PlaybackSettings, TimeField, UiSettings};
use crate::library::{Playlist, Track};
use crate::session::{NoticeLevel, Session};
use crate::transport::Transport;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("tab", "focus"),
        ("enter", "play"),
        ("space/p", "play/pause"),
        ("h/l", "prev/next"),
        // H/L is filled dynamically from config.
        ("+/-", "volume"),
        ("/", "search"),
        ("esc", "charts"),
        ("A", "artist top"),
        ("e", "enqueue"),
        ("c", "new playlist"),
        ("a", "add to playlist"),
        ("d", "remove from playlist"),
        ("[/]", "switch playlist"),
        ("R/X", "rename/delete playlist"),
        ("K", "metadata"),
        ("q", "quit"),
    ])
});

/// Render the controls help text, incorporating seek seconds.
fn controls_text(seek_seconds: u64) -> String {
    let order = [
        "j/k", "tab", "enter", "space/p", "h/l", "H/L", "+/-", "/", "esc", "A", "e", "c", "a",
        "d", "[/]", "R/X", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", seek_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
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

/// Uppercase the characters of `title` that fuzzy-match `query`.
fn highlight(title: &str, query: &str) -> String {
    let Some(positions) = App::fuzzy_match_positions(title, query) else {
        return title.to_string();
    };

    let mut rendered = String::new();
    let mut pos_iter = positions.into_iter();
    let mut next_pos = pos_iter.next();
    for (ci, ch) in title.chars().enumerate() {
        if next_pos == Some(ci) {
            rendered.extend(ch.to_uppercase());
            next_pos = pos_iter.next();
        } else {
            rendered.push(ch);
        }
    }
    rendered
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

/// Render `items` into `area`, keeping the selected row centered when the
/// list is taller than the area. Only the visible window is materialized.
fn render_track_list<'a>(
    frame: &mut Frame,
    area: Rect,
    tracks: impl ExactSizeIterator<Item = &'a Track>,
    selected: Option<usize>,
    block: Block<'static>,
    label: impl Fn(&Track) -> String,
) {
    let total = tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = selected.unwrap_or(0).min(total.saturating_sub(1));
    let (start, end, selected_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let items: Vec<ListItem> = tracks
        .skip(start)
        .take(end - start)
        .map(|t| ListItem::new(label(t)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 && selected.is_some() {
        state.select(Some(selected_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn status_text<T: Transport>(app: &App, session: &Session<T>, ui: &UiSettings) -> Line<'static> {
    let mut parts: Vec<String> = vec![session.state().label().to_string()];

    if let Some(track) = session.current_track() {
        let total = session
            .duration()
            .or_else(|| (track.duration_seconds > 0).then_some(track.duration_seconds as f64))
            .map(secs);
        match now_playing_time_text(secs(session.progress()), total, ui) {
            Some(time) => parts.push(format!("Song: {} [{}]", track.display(), time)),
            None => parts.push(format!("Song: {}", track.display())),
        }
    }

    parts.push(format!("Vol: {:.0}%", session.volume() * 100.0));
    parts.push(format!("Queue: {}", session.queue().len()));
    if app.showing_results && !app.last_query.is_empty() {
        parts.push(format!("Results: {}", app.last_query));
    }

    let mut line = Line::from(parts.join(" • "));
    if let Some(notice) = app.active_notice(Duration::from_millis(ui.notice_ms)) {
        let span = format!(" • {}", notice.message);
        line.push_span(match notice.level {
            NoticeLevel::Info => span.italic(),
            NoticeLevel::Error => span.bold().red(),
        });
    }
    line
}

fn metadata_text(track: Option<&Track>) -> String {
    let Some(track) = track else {
        return "No track selected".to_string();
    };
    let secs = track.duration_seconds;
    format!(
        "Title: {}\nArtist: {}\nDuration: {}:{:02} ({}s)\nSource: {}\nCover: {}",
        track.title,
        if track.artist.trim().is_empty() { "-" } else { track.artist.as_str() },
        secs / 60,
        secs % 60,
        secs,
        if track.is_playable() { track.audio_source_url.as_str() } else { "-" },
        if track.album_cover_url.is_empty() { "-" } else { track.album_cover_url.as_str() },
    )
}

fn playlist_metadata_text(playlist: &Playlist) -> String {
    format!(
        "\nPlaylist: {} (created {})\nPlaylist cover: {}",
        playlist.name,
        playlist.created_at.format("%Y-%m-%d"),
        playlist.cover().unwrap_or("-"),
    )
}

/// Render the entire UI into the provided `frame` using `app` and session state.
pub fn draw<T: Transport>(
    frame: &mut Frame,
    app: &App,
    session: &Session<T>,
    ui_settings: &UiSettings,
    playback_settings: &PlaybackSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app, session, ui_settings))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(columns[1]);

    // Library
    let library = app.library(session);
    let current_id = session.current_track().map(|t| t.id.as_str());
    let library_title = if app.showing_results {
        format!(" results ({}) ", library.len())
    } else {
        format!(" charts ({}) ", library.len())
    };
    let query = app.last_query.as_str();
    render_track_list(
        frame,
        columns[0],
        library.iter(),
        Some(app.library_cursor),
        pane_block(library_title, app.focus == Pane::Library),
        |t| {
            let marker = if Some(t.id.as_str()) == current_id { "♪ " } else { "" };
            let text = t.display();
            if query.is_empty() {
                format!("{marker}{text}")
            } else {
                format!("{marker}{}", highlight(&text, query))
            }
        },
    );

    // Up next
    render_track_list(
        frame,
        side[0],
        session.queue().iter(),
        (app.focus == Pane::Queue).then_some(app.queue_cursor),
        pane_block(
            format!(" up next ({}) ", session.queue().len()),
            app.focus == Pane::Queue,
        ),
        Track::display,
    );

    // Playlist
    let playlists = session.playlists();
    match playlists.get(app.playlist_index) {
        Some(playlist) => {
            let total = playlist.total_seconds();
            let title = format!(
                " {} [{}/{}] {} tracks, {}:{:02} ",
                playlist.name,
                app.playlist_index + 1,
                playlists.len(),
                playlist.tracks.len(),
                total / 60,
                total % 60
            );
            render_track_list(
                frame,
                side[1],
                playlist.tracks.iter(),
                (app.focus == Pane::Playlist).then_some(app.playlist_cursor),
                pane_block(title, app.focus == Pane::Playlist),
                Track::display,
            );
        }
        None => {
            let empty = Paragraph::new("No playlists yet. Press c to create one.")
                .block(pane_block(" playlists ".to_string(), app.focus == Pane::Playlist))
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, side[1]);
        }
    }

    // Recently played
    render_track_list(
        frame,
        side[2],
        session.recently_played().iter(),
        None,
        pane_block(
            format!(" recently played ({}) ", session.recently_played().len()),
            false,
        ),
        Track::display,
    );

    // Overlay metadata popup (keeps lists visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 11, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let mut meta = metadata_text(app.focused_track(session));
        if app.focus == Pane::Playlist {
            if let Some(playlist) = playlists.get(app.playlist_index) {
                meta.push_str(&playlist_metadata_text(playlist));
            }
        }
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    // Footer doubles as the prompt line.
    let (footer_title, footer_text) = match app.input_mode {
        InputMode::Normal => (" controls ", controls_text(playback_settings.seek_seconds)),
        mode => (
            " input (enter submits, esc cancels) ",
            format!("{}{}_", mode.prompt(), app.input),
        ),
    };
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(footer_title)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_text_follows_configured_fields() {
        let mut ui = UiSettings::default();
        let text = now_playing_time_text(
            Duration::from_secs(65),
            Some(Duration::from_secs(200)),
            &ui,
        );
        assert_eq!(text.as_deref(), Some("01:05 / 03:20"));

        ui.now_playing_time_fields = vec![TimeField::Remaining];
        let text = now_playing_time_text(
            Duration::from_secs(65),
            Some(Duration::from_secs(200)),
            &ui,
        );
        assert_eq!(text.as_deref(), Some("-02:15"));

        ui.now_playing_time_fields = vec![TimeField::Total];
        assert!(now_playing_time_text(Duration::ZERO, None, &ui).is_none());
    }

    #[test]
    fn controls_text_includes_seek_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] seek -/+7s"));
        assert!(text.starts_with("[j/k] up/down"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn highlight_uppercases_matched_characters() {
        assert_eq!(highlight("daft punk", "dp"), "Daft Punk");
        assert_eq!(highlight("daft punk", "zz"), "daft punk");
    }

    #[test]
    fn metadata_text_handles_missing_fields() {
        assert_eq!(metadata_text(None), "No track selected");
        let track = Track {
            id: "1".into(),
            title: "One".into(),
            artist: String::new(),
            album_cover_url: String::new(),
            audio_source_url: String::new(),
            duration_seconds: 125,
            artist_id: None,
            album_id: None,
        };
        let text = metadata_text(Some(&track));
        assert!(text.contains("Artist: -"));
        assert!(text.contains("Duration: 2:05 (125s)"));
        assert!(text.contains("Source: -"));
    }

    #[test]
    fn playlist_metadata_mentions_cover_fallback() {
        let playlist = Playlist::new("Road trip");
        let text = playlist_metadata_text(&playlist);
        assert!(text.contains("Playlist: Road trip"));
        assert!(text.contains("Playlist cover: -"));
    }
}
