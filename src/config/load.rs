use std::{env, path::PathBuf};

use super::schema::Settings;

const DB_FILE_NAME: &str = "playlist.db";

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `ENCORE__`) override it, and falls back to struct defaults.
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
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err("audio.volume must be within 0.0..=1.0".to_string());
        }
        if !(self.audio.volume_step > 0.0 && self.audio.volume_step <= 1.0) {
            return Err("audio.volume_step must be within (0.0, 1.0]".to_string());
        }
        if self.audio.crossfade_steps == 0 {
            return Err("audio.crossfade_steps must be >= 1".to_string());
        }
        if self.playback.position_poll_ms == 0 || self.playback.end_check_ms == 0 {
            return Err("playback poll intervals must be >= 1ms".to_string());
        }
        if self.ui.thumbnail_size == 0 || self.ui.cover_size == 0 {
            return Err("ui.thumbnail_size and ui.cover_size must be >= 1".to_string());
        }
        Ok(())
    }

    /// Where the playlist database lives: `store.path` if set, else the default.
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .or_else(default_store_path)
            .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/encore/config.toml`
/// or `~/.config/encore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("encore").join("config.toml"))
}

/// Compute the default database path under `$XDG_DATA_HOME/encore/playlist.db`
/// or `~/.local/share/encore/playlist.db`.
pub fn default_store_path() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("encore").join(DB_FILE_NAME))
}
