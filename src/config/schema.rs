use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub playback: PlaybackSettings,
    pub storage: StorageSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Set to false to stay offline and browse the built-in samples only.
    pub enabled: bool,
    /// Base URL of the catalog API (Deezer-compatible).
    pub base_url: String,
    /// Connect/read timeout for catalog and audio downloads (milliseconds).
    pub timeout_ms: u64,
    /// Extra attempts after a retryable failure.
    pub retries: u32,
    /// Delay between attempts, multiplied by the attempt number (milliseconds).
    pub retry_backoff_ms: u64,
    /// Number of chart tracks loaded at startup.
    pub chart_limit: usize,
    /// Page size for search and artist lookups.
    pub page_limit: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.deezer.com".to_string(),
            timeout_ms: 8000,
            retries: 1,
            retry_backoff_ms: 400,
            chart_limit: 50,
            page_limit: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume applied at startup, in `[0, 1]`.
    pub initial_volume: f32,
    /// Volume change per `+` / `-` key press.
    pub volume_step: f32,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            volume_step: 0.05,
            seek_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where playlists and history live. Defaults to the XDG data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show for the status line, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,

    /// How long a notice stays in the status bar (milliseconds).
    pub notice_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ encore ~ ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
            notice_ms: 4000,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Log file. Defaults to `encore.log` inside the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
