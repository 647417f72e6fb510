use std::{env, path::PathBuf};

use super::schema::Settings;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ENCORE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ENCORE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.playback.initial_volume) {
            return Err("playback.initial_volume must be within [0, 1]".to_string());
        }
        if !(self.playback.volume_step > 0.0 && self.playback.volume_step <= 1.0) {
            return Err("playback.volume_step must be within (0, 1]".to_string());
        }
        if self.catalog.enabled && self.catalog.base_url.trim().is_empty() {
            return Err("catalog.base_url must not be empty".to_string());
        }
        if self.catalog.chart_limit == 0 {
            return Err("catalog.chart_limit must be >= 1".to_string());
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(format!("log.level must be one of {}", LOG_LEVELS.join(", ")));
        }
        Ok(())
    }

    /// Directory for playlists, history and the log file.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from(".encore"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("encore.log"))
    }

    /// Render the settings as TOML, e.g. to seed a config file.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/encore/config.toml`
/// or `~/.config/encore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("encore").join("config.toml"))
}

/// `$XDG_DATA_HOME/encore` or `~/.local/share/encore`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("encore"))
}
