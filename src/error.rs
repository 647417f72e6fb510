//! Error types shared across the session, catalog, transport and store layers.
//!
//! Every variant here is recoverable: the runtime turns them into a transient
//! notice in the status bar instead of tearing the session down.

use thiserror::Error;

/// Errors reported by playback and playlist operations on the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The track has no playable audio source.
    #[error("Track '{0}' has no audio source")]
    InvalidTrack(String),

    /// The transport refused to start (bad source, decode failure, no device).
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Invalid caller input (empty playlist name, NaN volume, ...).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unknown playlist or track id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The track is already part of the playlist.
    #[error("'{track}' is already in playlist '{playlist}'")]
    AlreadyInPlaylist { playlist: String, track: String },
}

/// Catalog request failures. Always recovered through the sample fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Transport-level failure (DNS, connect, timeout).
    #[error("Catalog request failed: {0}")]
    Network(String),

    /// Non-2xx HTTP status.
    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    /// The API answered with an error payload.
    #[error("Catalog API error: {0}")]
    Api(String),

    /// Payload did not have the expected shape.
    #[error("Malformed catalog payload: {0}")]
    Malformed(String),

    /// The request succeeded but produced no usable tracks.
    #[error("Catalog returned no tracks")]
    Empty,

    /// Remote catalog disabled in settings.
    #[error("Remote catalog disabled")]
    Disabled,
}

/// Audio transport failures.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("No audio output device: {0}")]
    NoDevice(String),

    /// The source could not be opened or downloaded.
    #[error("Cannot open source '{url}': {reason}")]
    Source { url: String, reason: String },

    #[error("Cannot decode '{url}': {reason}")]
    Decode { url: String, reason: String },

    #[error("No source loaded")]
    NothingLoaded,
}

/// Persistence failures. Logged, never surfaced to the user.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
