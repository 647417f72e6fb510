//! Upstream JSON shapes and their validation into `Track`.
//!
//! The API is loose about types (ids arrive as numbers or strings, fields go
//! missing), so everything is optional here and checked in `into_track`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CatalogError;
use crate::library::Track;

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawArtist {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAlbum {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    cover_medium: Option<String>,
    #[serde(default)]
    cover: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    artist: Option<RawArtist>,
    #[serde(default)]
    album: Option<RawAlbum>,
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl RawTrack {
    /// `None` when the record lacks an id or a title.
    fn into_track(self) -> Option<Track> {
        let id = self.id.as_ref().and_then(id_string)?;
        let title = non_blank(self.title)?;
        let raw_artist = self.artist.unwrap_or_default();
        let album = self.album.unwrap_or_default();

        Some(Track {
            id,
            title,
            artist: non_blank(raw_artist.name).unwrap_or_else(|| "Unknown Artist".to_string()),
            album_cover_url: non_blank(album.cover_medium)
                .or_else(|| non_blank(album.cover))
                .unwrap_or_default(),
            audio_source_url: non_blank(self.preview).unwrap_or_default(),
            duration_seconds: self.duration.unwrap_or(0),
            artist_id: raw_artist.id.as_ref().and_then(id_string),
            album_id: album.id.as_ref().and_then(id_string),
        })
    }
}

fn check_api_error(payload: &Value) -> Result<(), CatalogError> {
    if let Some(err) = payload.get("error") {
        let err: ApiError = serde_json::from_value(err.clone())
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;
        let msg = if err.kind.is_empty() {
            err.message
        } else {
            format!("{}: {}", err.kind, err.message)
        };
        return Err(CatalogError::Api(msg));
    }
    Ok(())
}

/// Parse a `{"data": [...]}` list payload. Invalid records are dropped.
pub(super) fn parse_track_list(payload: Value) -> Result<Vec<Track>, CatalogError> {
    check_api_error(&payload)?;
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::Malformed("missing `data` array".to_string()))?;

    let total = data.len();
    let tracks: Vec<Track> = data
        .iter()
        .filter_map(|item| serde_json::from_value::<RawTrack>(item.clone()).ok())
        .filter_map(RawTrack::into_track)
        .collect();
    if tracks.len() < total {
        log::debug!("catalog: dropped {} invalid track record(s)", total - tracks.len());
    }
    Ok(tracks)
}

/// Parse a single track object payload.
pub(super) fn parse_track(payload: Value) -> Result<Track, CatalogError> {
    check_api_error(&payload)?;
    let raw: RawTrack =
        serde_json::from_value(payload).map_err(|e| CatalogError::Malformed(e.to_string()))?;
    raw.into_track()
        .ok_or_else(|| CatalogError::Malformed("track without id or title".to_string()))
}
