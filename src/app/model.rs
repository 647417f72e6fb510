//! Application model types: `App`, `Pane` and `InputMode`.

use std::time::{Duration, Instant};

use crate::library::Track;
use crate::session::Session;
use crate::session::Notice;
use crate::transport::Transport;

/// Which list has keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Library,
    Queue,
    Playlist,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Self::Library => Self::Queue,
            Self::Queue => Self::Playlist,
            Self::Playlist => Self::Library,
        }
    }
}

/// What the prompt line is collecting, if anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    NewPlaylist,
    RenamePlaylist,
}

impl InputMode {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Search => "search: ",
            Self::NewPlaylist => "new playlist: ",
            Self::RenamePlaylist => "rename playlist: ",
        }
    }
}

/// The main UI model.
#[derive(Default)]
pub struct App {
    pub focus: Pane,
    pub input_mode: InputMode,
    pub input: String,

    /// Library pane shows search/artist results instead of the catalog.
    pub showing_results: bool,
    /// Query of the last submitted search, used for highlighting.
    pub last_query: String,

    pub library_cursor: usize,
    pub queue_cursor: usize,
    pub playlist_index: usize,
    pub playlist_cursor: usize,

    pub metadata_window: bool,
    notice: Option<(Notice, Instant)>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Tracks currently listed in the library pane.
    pub fn library<'a, T: Transport>(&self, session: &'a Session<T>) -> &'a [Track] {
        if self.showing_results {
            session.search_results()
        } else {
            session.catalog()
        }
    }

    pub fn selected_library_track<'a, T: Transport>(
        &self,
        session: &'a Session<T>,
    ) -> Option<&'a Track> {
        self.library(session).get(self.library_cursor)
    }

    pub fn selected_playlist_id<T: Transport>(&self, session: &Session<T>) -> Option<String> {
        session
            .playlists()
            .get(self.playlist_index)
            .map(|p| p.id.clone())
    }

    /// Track under the cursor in whichever pane has focus.
    pub fn focused_track<'a, T: Transport>(&self, session: &'a Session<T>) -> Option<&'a Track> {
        match self.focus {
            Pane::Library => self.selected_library_track(session),
            Pane::Queue => session.queue().get(self.queue_cursor),
            Pane::Playlist => session
                .playlists()
                .get(self.playlist_index)
                .and_then(|p| p.tracks.get(self.playlist_cursor)),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Pane::Library => &mut self.library_cursor,
            Pane::Queue => &mut self.queue_cursor,
            Pane::Playlist => &mut self.playlist_cursor,
        }
    }

    /// Move the focused cursor down, wrapping around `len`.
    pub fn next(&mut self, len: usize) {
        let cursor = self.cursor_mut();
        *cursor = if len == 0 { 0 } else { (*cursor + 1) % len };
    }

    /// Move the focused cursor up, wrapping around `len`.
    pub fn prev(&mut self, len: usize) {
        let cursor = self.cursor_mut();
        *cursor = match (len, *cursor) {
            (0, _) => 0,
            (n, 0) => n - 1,
            (n, c) => (c - 1).min(n - 1),
        };
    }

    pub fn first(&mut self) {
        *self.cursor_mut() = 0;
    }

    pub fn last(&mut self, len: usize) {
        *self.cursor_mut() = len.saturating_sub(1);
    }

    /// Step through playlists, resetting the track cursor.
    pub fn next_playlist(&mut self, count: usize) {
        if count > 0 {
            self.playlist_index = (self.playlist_index + 1) % count;
            self.playlist_cursor = 0;
        }
    }

    pub fn prev_playlist(&mut self, count: usize) {
        if count > 0 {
            self.playlist_index = (self.playlist_index + count - 1) % count;
            self.playlist_cursor = 0;
        }
    }

    /// Keep every cursor inside the lists it points into.
    pub fn clamp_cursors<T: Transport>(&mut self, session: &Session<T>) {
        let library_len = self.library(session).len();
        self.library_cursor = self.library_cursor.min(library_len.saturating_sub(1));
        self.queue_cursor = self.queue_cursor.min(session.queue().len().saturating_sub(1));

        let playlists = session.playlists();
        self.playlist_index = self.playlist_index.min(playlists.len().saturating_sub(1));
        let tracks = playlists
            .get(self.playlist_index)
            .map(|p| p.tracks.len())
            .unwrap_or(0);
        self.playlist_cursor = self.playlist_cursor.min(tracks.saturating_sub(1));
    }

    /// Open the prompt line in `mode`, optionally pre-filled.
    pub fn begin_input(&mut self, mode: InputMode, initial: &str) {
        self.input_mode = mode;
        self.input = initial.to_string();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Close the prompt and hand back what was typed.
    pub fn submit_input(&mut self) -> (InputMode, String) {
        let mode = std::mem::take(&mut self.input_mode);
        (mode, std::mem::take(&mut self.input))
    }

    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Switch the library pane to result mode for `query`.
    pub fn show_results(&mut self, query: &str) {
        self.showing_results = true;
        self.last_query = query.trim().to_string();
        self.library_cursor = 0;
        self.focus = Pane::Library;
    }

    /// Back to the catalog listing.
    pub fn show_catalog(&mut self) {
        self.showing_results = false;
        self.last_query.clear();
        self.library_cursor = 0;
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some((notice, Instant::now()));
    }

    /// The current notice, if it is younger than `ttl`.
    pub fn active_notice(&self, ttl: Duration) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|(_, at)| at.elapsed() < ttl)
            .map(|(n, _)| n)
    }

    /// Fuzzy/subsequence match: return the character positions in `title`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_ascii_lowercase();
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }
}
