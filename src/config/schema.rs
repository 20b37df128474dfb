use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/encore/config.toml` or `~/.config/encore/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ENCORE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub store: StoreSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial output volume in `[0, 1]`.
    pub volume: f32,
    /// Volume change applied by the `+` / `-` shortcuts.
    pub volume_step: f32,
    /// Crossfade duration when switching tracks (milliseconds).
    /// Set to 0 for a hard swap.
    pub crossfade_ms: u64,
    /// Number of steps used to fade volumes (higher = smoother, more CPU).
    pub crossfade_steps: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            volume_step: 0.1,
            crossfade_ms: 0,
            crossfade_steps: 10,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether repeat-one starts enabled.
    pub repeat: bool,
    /// How often the elapsed-time display is refreshed (milliseconds).
    pub position_poll_ms: u64,
    /// How often the player checks whether the current track has ended (milliseconds).
    pub end_check_ms: u64,
    /// After a seek, position updates from the engine are ignored for this long (milliseconds).
    pub seek_grace_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat: false,
            position_poll_ms: 200,
            end_check_ms: 1000,
            seek_grace_ms: 500,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    /// "artist - title" when an artist tag exists, else the title.
    Display,
    Title,
    Artist,
    Album,
    /// File name including its extension.
    #[serde(alias = "basename")]
    Filename,
    /// File name without its extension.
    Stem,
    Path,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    /// Also used as the file picker filter.
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when adding a folder.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles) when adding a folder.
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories when adding a folder.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields make up a playlist row.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            display_fields: vec![TrackDisplayField::Filename],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Location of the playlist database. Defaults to the XDG data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub window_title: String,
    /// Start in fullscreen. Escape leaves it, F11 toggles it.
    pub fullscreen: bool,
    /// Text shown in the header bar.
    pub header_text: String,
    /// Optional image shown next to the header text.
    pub logo_path: Option<PathBuf>,
    /// Edge length of playlist thumbnails, in pixels.
    pub thumbnail_size: u32,
    /// Edge length of the now-playing cover, in pixels.
    pub cover_size: u32,
    pub now_playing_prefix: String,

    /// Which track fields to show after `now_playing_prefix`, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,
    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_title: "Encore".to_string(),
            fullscreen: true,
            header_text: "Encore".to_string(),
            logo_path: None,
            thumbnail_size: 50,
            cover_size: 200,
            now_playing_prefix: "Now Playing: ".to_string(),
            now_playing_track_fields: vec![TrackDisplayField::Filename],
            now_playing_track_separator: " - ".to_string(),
        }
    }
}
