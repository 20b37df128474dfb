//! Application model types: `App` and `PlaybackState`.
//!
//! `App` holds the playlist, the current index and the player flags. Every
//! transport operation is a state transition that returns the command the
//! audio thread should receive, if any.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::audio::{AudioCmd, AudioEvent, PlaybackInfo};
use crate::library::Track;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    /// Highlighted row; the target of Return, Delete and next/previous.
    pub current: Option<usize>,
    pub playback: PlaybackState,
    pub repeat: bool,
    pub volume: f32,
    pub volume_step: f32,
    /// Last position shown for the loaded track.
    pub position: Duration,
    /// Position updates are ignored this long after a seek.
    pub seek_grace: Duration,
    /// The track most recently handed to the audio thread.
    pub now_playing: Option<Track>,

    last_seek: Option<Instant>,
    load_token: u64,
    scroll_pending: bool,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            current: None,
            playback: PlaybackState::Stopped,
            repeat: false,
            volume: 1.0,
            volume_step: 0.1,
            position: Duration::ZERO,
            seek_grace: Duration::from_millis(500),
            now_playing: None,
            last_seek: None,
            load_token: 0,
            scroll_pending: false,
        }
    }

    /// Return true if the playlist contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.playback == PlaybackState::Paused
    }

    /// Token of the latest load sent to the audio thread.
    pub fn load_token(&self) -> u64 {
        self.load_token
    }

    /// Length of the loaded track, when its tags report one.
    pub fn total(&self) -> Option<Duration> {
        self.now_playing.as_ref().and_then(|t| t.duration)
    }

    /// Replace the playlist after a reload; an out-of-range current index is dropped.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if self.current.is_some_and(|i| i >= self.tracks.len()) {
            self.current = None;
        }
    }

    /// Row the playlist view should scroll to, once per play or selection move.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        if std::mem::take(&mut self.scroll_pending) {
            self.current
        } else {
            None
        }
    }

    fn next_token(&mut self) -> u64 {
        self.load_token += 1;
        self.load_token
    }

    /// Start the track at `index` from the beginning.
    pub fn play(&mut self, index: usize, now: Instant) -> Option<AudioCmd> {
        let track = self.tracks.get(index)?.clone();
        let token = self.next_token();

        self.current = Some(index);
        self.playback = PlaybackState::Playing;
        self.position = Duration::ZERO;
        self.last_seek = Some(now);
        self.scroll_pending = true;

        let cmd = AudioCmd::Load {
            token,
            path: track.path.clone(),
            start_at: Duration::ZERO,
            paused: false,
        };
        self.now_playing = Some(track);
        Some(cmd)
    }

    pub fn play_first(&mut self, now: Instant) -> Option<AudioCmd> {
        self.play(0, now)
    }

    pub fn play_current_or_first(&mut self, now: Instant) -> Option<AudioCmd> {
        self.play(self.current.unwrap_or(0), now)
    }

    /// Pick a uniformly random track and play it.
    pub fn play_random<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Option<AudioCmd> {
        if self.tracks.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.tracks.len());
        self.play(index, now)
    }

    /// Pause when playing, resume when paused, otherwise start the current track.
    pub fn toggle_pause(&mut self, now: Instant) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Playing => {
                self.playback = PlaybackState::Paused;
                Some(AudioCmd::Pause)
            }
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::Resume)
            }
            PlaybackState::Stopped => self.play_current_or_first(now),
        }
    }

    pub fn pause(&mut self) -> Option<AudioCmd> {
        if self.playback == PlaybackState::Playing {
            self.playback = PlaybackState::Paused;
            Some(AudioCmd::Pause)
        } else {
            None
        }
    }

    pub fn resume(&mut self, now: Instant) -> Option<AudioCmd> {
        match self.playback {
            PlaybackState::Paused => {
                self.playback = PlaybackState::Playing;
                Some(AudioCmd::Resume)
            }
            PlaybackState::Stopped => self.play_current_or_first(now),
            PlaybackState::Playing => None,
        }
    }

    /// Stop the engine. The current index is kept so Return replays it.
    pub fn stop(&mut self) -> AudioCmd {
        self.playback = PlaybackState::Stopped;
        self.position = Duration::ZERO;
        AudioCmd::Stop
    }

    /// Play the track after the current one; no wrap at the end.
    pub fn next(&mut self, now: Instant) -> Option<AudioCmd> {
        let next = self.current? + 1;
        if next < self.tracks.len() {
            self.play(next, now)
        } else {
            None
        }
    }

    /// Play the track before the current one; no wrap at the start.
    pub fn prev(&mut self, now: Instant) -> Option<AudioCmd> {
        let current = self.current?;
        if current > 0 {
            self.play(current - 1, now)
        } else {
            None
        }
    }

    /// Move the highlight down without touching playback.
    pub fn select_next(&mut self) {
        if let Some(i) = self.current {
            if i + 1 < self.tracks.len() {
                self.current = Some(i + 1);
                self.scroll_pending = true;
            }
        }
    }

    /// Move the highlight up without touching playback.
    pub fn select_prev(&mut self) {
        if let Some(i) = self.current {
            if i > 0 {
                self.current = Some(i - 1);
                self.scroll_pending = true;
            }
        }
    }

    /// Jump within the loaded track, keeping it paused if it was not playing.
    pub fn seek_to(&mut self, pos: Duration, now: Instant) -> Option<AudioCmd> {
        let (path, total) = self
            .now_playing
            .as_ref()
            .map(|t| (t.path.clone(), t.duration))?;
        let pos = total.map_or(pos, |d| pos.min(d));
        let was_playing = self.playback == PlaybackState::Playing;
        let token = self.next_token();

        self.last_seek = Some(now);
        self.position = pos;
        self.playback = if was_playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };

        Some(AudioCmd::Load {
            token,
            path,
            start_at: pos,
            paused: !was_playing,
        })
    }

    pub fn set_volume(&mut self, volume: f32) -> AudioCmd {
        self.volume = (volume.clamp(0.0, 1.0) * 100.0).round() / 100.0;
        AudioCmd::SetVolume(self.volume)
    }

    pub fn volume_up(&mut self) -> AudioCmd {
        self.set_volume(self.volume + self.volume_step)
    }

    pub fn volume_down(&mut self) -> AudioCmd {
        self.set_volume(self.volume - self.volume_step)
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Store row id of the highlighted entry.
    pub fn current_row_id(&self) -> Option<i64> {
        self.current
            .and_then(|i| self.tracks.get(i))
            .map(|t| t.id)
    }

    /// Copy the engine position into the display, unless a seek just happened.
    pub fn refresh_position(&mut self, info: &PlaybackInfo, now: Instant) {
        if self.now_playing.is_none() || info.token != self.load_token || !info.playing {
            return;
        }
        if self
            .last_seek
            .is_some_and(|t| now.saturating_duration_since(t) <= self.seek_grace)
        {
            return;
        }
        self.position = info.elapsed_at(now);
    }

    /// React to an audio thread event. Events about superseded loads are ignored.
    pub fn handle_event(&mut self, event: AudioEvent, now: Instant) -> Option<AudioCmd> {
        if event.token() != self.load_token {
            log::debug!("ignoring stale audio event {event:?}");
            return None;
        }

        match event {
            AudioEvent::Finished { .. } => {
                match self.playback {
                    PlaybackState::Playing => {}
                    // The sink drained before a pause reached it; there is nothing left to resume.
                    PlaybackState::Paused => {
                        self.playback = PlaybackState::Stopped;
                        self.position = Duration::ZERO;
                        return None;
                    }
                    PlaybackState::Stopped => return None,
                }
                if self.repeat {
                    if let Some(i) = self.current {
                        return self.play(i, now);
                    }
                }
                let next = self.current.map(|i| i + 1).filter(|&n| n < self.tracks.len());
                match next {
                    Some(n) => self.play(n, now),
                    None => {
                        self.playback = PlaybackState::Stopped;
                        self.position = Duration::ZERO;
                        None
                    }
                }
            }
            AudioEvent::LoadFailed { path, reason, .. } => {
                log::warn!("cannot play {}: {reason}", path.display());
                self.playback = PlaybackState::Stopped;
                self.position = Duration::ZERO;
                None
            }
        }
    }
}
