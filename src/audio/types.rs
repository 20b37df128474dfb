//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, events it reports back, and the shared
//! playback snapshot read by the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Replace whatever is loaded with `path`, positioned at `start_at`.
    ///
    /// `token` is echoed back in events about this load.
    Load {
        token: u64,
        path: PathBuf,
        start_at: Duration,
        paused: bool,
    },
    Pause,
    Resume,
    /// Stop playback and unload the current file.
    Stop,
    /// Output volume in `[0, 1]`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The file loaded under `token` played to its end.
    Finished { token: u64 },
    /// The file could not be opened or decoded.
    LoadFailed {
        token: u64,
        path: PathBuf,
        reason: String,
    },
}

impl AudioEvent {
    pub fn token(&self) -> u64 {
        match self {
            Self::Finished { token } | Self::LoadFailed { token, .. } => *token,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Token of the most recent successful load.
    pub token: u64,
    /// File currently loaded, if any.
    pub path: Option<PathBuf>,
    /// Position accumulated before `started_at`.
    pub accumulated: Duration,
    /// Set while the sink is running.
    pub started_at: Option<Instant>,
    /// Whether playback is currently active.
    pub playing: bool,
}

impl PlaybackInfo {
    /// Position within the loaded file as of `now`.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    pub(super) fn start(
        &mut self,
        token: u64,
        path: PathBuf,
        start_at: Duration,
        paused: bool,
        now: Instant,
    ) {
        self.token = token;
        self.path = Some(path);
        self.accumulated = start_at;
        self.started_at = if paused { None } else { Some(now) };
        self.playing = !paused;
    }

    pub(super) fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
        self.playing = false;
    }

    pub(super) fn resume(&mut self, now: Instant) {
        if self.path.is_some() && !self.playing {
            self.started_at = Some(now);
            self.playing = true;
        }
    }

    pub(super) fn clear(&mut self) {
        let token = self.token;
        *self = Self {
            token,
            ..Self::default()
        };
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
