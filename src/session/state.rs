use crate::catalog::CatalogResult;
use crate::error::SessionError;
use crate::library::Track;

/// Maximum number of entries kept in the recently-played history.
pub const RECENTLY_PLAYED_LIMIT: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No current track.
    #[default]
    Idle,
    /// Source assigned, playback not yet confirmed.
    Loading,
    Playing,
    Paused,
    /// End of media; immediately followed by `next()`.
    Ended,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Stopped",
            Self::Loading => "Loading",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Ended => "Ended",
        }
    }
}

/// Most-recent-first history, unique by track id and capped at
/// `RECENTLY_PLAYED_LIMIT`.
#[derive(Debug, Default, Clone)]
pub struct RecentlyPlayed {
    tracks: Vec<Track>,
}

impl RecentlyPlayed {
    /// Build from a persisted list, keeping the first occurrence of each id.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut out = Self::default();
        for t in tracks {
            if out.tracks.len() == RECENTLY_PLAYED_LIMIT {
                break;
            }
            if !out.tracks.contains(&t) {
                out.tracks.push(t);
            }
        }
        out
    }

    /// Move `track` to the front, dropping the oldest entry past the cap.
    pub fn insert(&mut self, track: Track) {
        self.tracks.retain(|t| t.id != track.id);
        self.tracks.insert(0, track);
        self.tracks.truncate(RECENTLY_PLAYED_LIMIT);
    }

    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient user-facing message (status bar toast).
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<SessionError> for Notice {
    fn from(e: SessionError) -> Self {
        Self::error(e.to_string())
    }
}

/// Catalog work the session wants done off the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchRequest {
    Chart { limit: usize },
    /// Tagged with the search sequence number at issue time.
    Search { seq: u64, query: String },
    /// Tagged with the play token at issue time.
    Recommendations { token: u64, track_id: String },
    ArtistTop { seq: u64, artist_id: String },
}

/// A finished `FetchRequest` and its raw result.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: CatalogResult,
}
