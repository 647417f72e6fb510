use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A playable song as delivered by the catalog.
///
/// Two tracks are equal when their ids are equal; every other field is
/// metadata that may drift between catalog responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album_cover_url: String,
    #[serde(default)]
    pub audio_source_url: String,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub album_id: Option<String>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Track {
    /// True when the track carries a non-blank audio source.
    pub fn is_playable(&self) -> bool {
        !self.audio_source_url.trim().is_empty()
    }

    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        make_display(&self.title, &self.artist)
    }

    /// The performing artist, when the catalog supplied an id to browse by.
    pub fn artist_ref(&self) -> Option<Artist> {
        let id = self.artist_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        Some(Artist {
            id: id.to_string(),
            name: self.artist.clone(),
        })
    }
}

fn make_display(title: &str, artist: &str) -> String {
    let artist = artist.trim();
    if artist.is_empty() {
        title.to_string()
    } else {
        format!("{} - {}", artist, title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// A user playlist. Track ids are unique within `tracks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Playlist {
    /// Create an empty playlist with a fresh id. `name` is stored trimmed.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            tracks: Vec::new(),
            created_at: Utc::now(),
            cover_url: None,
        }
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Append `track` unless a track with the same id is already present.
    /// Returns whether the playlist changed.
    pub fn push_unique(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove the track with `track_id`. Returns whether the playlist changed.
    pub fn remove(&mut self, track_id: &str) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        self.tracks.len() != before
    }

    /// Explicit cover, else the cover of the first track.
    pub fn cover(&self) -> Option<&str> {
        self.cover_url
            .as_deref()
            .or_else(|| self.tracks.first().map(|t| t.album_cover_url.as_str()))
            .filter(|s| !s.is_empty())
    }

    /// Total runtime of all tracks.
    pub fn total_seconds(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_seconds as u64).sum()
    }
}
