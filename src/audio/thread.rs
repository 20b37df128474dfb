use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

/// How often the thread wakes up to notice a drained sink.
const TICK: Duration = Duration::from_millis(100);
const QUIT_FADE_STEPS: u64 = 20;

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                log::error!("no audio output device: {e}");
                reject_loads(rx, &events);
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);

        let mut deck = Deck {
            sink: None,
            info: PlaybackInfo::default(),
            volume: 1.0,
            shared: playback_info,
            events,
            settings: audio_settings,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Load {
                    token,
                    path,
                    start_at,
                    paused,
                }) => deck.load(&stream, token, path, start_at, paused),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::Resume) => deck.resume(),
                Ok(AudioCmd::Stop) => deck.stop(),
                Ok(AudioCmd::SetVolume(v)) => deck.set_volume(v),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => deck.check_finished(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Without an output device every load fails; keep answering until told to quit.
fn reject_loads(rx: Receiver<AudioCmd>, events: &Sender<AudioEvent>) {
    for cmd in rx {
        match cmd {
            AudioCmd::Load { token, path, .. } => {
                let _ = events.send(AudioEvent::LoadFailed {
                    token,
                    path,
                    reason: "no audio output device".to_string(),
                });
            }
            AudioCmd::Quit { .. } => break,
            _ => {}
        }
    }
}

struct Deck {
    sink: Option<Sink>,
    info: PlaybackInfo,
    volume: f32,
    shared: PlaybackHandle,
    events: Sender<AudioEvent>,
    settings: AudioSettings,
}

impl Deck {
    fn publish(&self) {
        if let Ok(mut info) = self.shared.lock() {
            *info = self.info.clone();
        }
    }

    fn load(
        &mut self,
        stream: &OutputStream,
        token: u64,
        path: PathBuf,
        start_at: Duration,
        paused: bool,
    ) {
        match create_sink_at(stream, &path, start_at) {
            Ok(sink) => self.swap_in(token, path, start_at, paused, sink),
            Err(e) => {
                log::warn!("{e}");
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                self.info.clear();
                self.publish();
                let _ = self.events.send(AudioEvent::LoadFailed {
                    token,
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Replace the current sink, crossfading between different tracks.
    fn swap_in(
        &mut self,
        token: u64,
        path: PathBuf,
        start_at: Duration,
        paused: bool,
        new_sink: Sink,
    ) {
        // The new track is audible from the first fade step.
        let started = Instant::now();

        if let Some(old) = self.sink.take() {
            // Seeking reloads the same file; only a track change crossfades.
            let same_file = self.info.path.as_ref() == Some(&path);
            if self.info.playing && !paused && !same_file && self.settings.crossfade_ms > 0 {
                crossfade(
                    &old,
                    &new_sink,
                    self.volume,
                    self.settings.crossfade_ms,
                    self.settings.crossfade_steps,
                );
            }
            old.stop();
        }

        new_sink.set_volume(self.volume);
        if !paused {
            new_sink.play();
        }
        log::debug!("loaded {} at {:?} (token {token})", path.display(), start_at);

        self.sink = Some(new_sink);
        self.info.start(token, path, start_at, paused, started);
        self.publish();
    }

    fn pause(&mut self) {
        if let Some(ref s) = self.sink {
            s.pause();
            self.info.pause(Instant::now());
            self.publish();
        }
    }

    fn resume(&mut self) {
        if let Some(ref s) = self.sink {
            s.play();
            self.info.resume(Instant::now());
            self.publish();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.info.clear();
        self.publish();
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(ref s) = self.sink {
            s.set_volume(self.volume);
        }
    }

    /// Periodic check for a sink that ran out on its own.
    fn check_finished(&mut self) {
        let drained = self
            .sink
            .as_ref()
            .is_some_and(|s| self.info.playing && s.empty());
        if !drained {
            return;
        }

        self.sink = None;
        self.info.pause(Instant::now());
        self.publish();
        let _ = self.events.send(AudioEvent::Finished {
            token: self.info.token,
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            if self.info.playing {
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.info.pause(Instant::now());
        self.publish();
    }
}

/// Fade volumes in a short blocking loop; audio continues in rodio's mixer thread.
fn crossfade(old: &Sink, new: &Sink, volume: f32, crossfade_ms: u64, steps: u64) {
    let steps = steps.max(1);
    new.set_volume(0.0);
    new.play();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        old.set_volume(volume * (1.0 - t));
        new.set_volume(volume * t);
        thread::sleep(Duration::from_millis((crossfade_ms / steps).max(1)));
    }
}

fn fade_out_sink(sink: &Sink, volume: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let step_ms = (fade_out_ms / QUIT_FADE_STEPS).max(1);
    for step in 1..=QUIT_FADE_STEPS {
        let t = step as f32 / QUIT_FADE_STEPS as f32;
        sink.set_volume(volume * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex, mpsc};

    fn idle_deck(crossfade_ms: u64) -> (Deck, Receiver<AudioEvent>) {
        let (events, events_rx) = mpsc::channel();
        let deck = Deck {
            sink: None,
            info: PlaybackInfo::default(),
            volume: 1.0,
            shared: Arc::new(Mutex::new(PlaybackInfo::default())),
            events,
            settings: AudioSettings {
                crossfade_ms,
                crossfade_steps: 4,
                ..AudioSettings::default()
            },
        };
        (deck, events_rx)
    }

    #[test]
    fn without_a_device_every_load_fails_until_quit() {
        let (tx, rx) = mpsc::channel();
        let (events, events_rx) = mpsc::channel();
        tx.send(AudioCmd::SetVolume(0.5)).unwrap();
        tx.send(AudioCmd::Load {
            token: 7,
            path: PathBuf::from("/music/a.mp3"),
            start_at: Duration::ZERO,
            paused: false,
        })
        .unwrap();
        tx.send(AudioCmd::Pause).unwrap();
        tx.send(AudioCmd::Quit { fade_out_ms: 0 }).unwrap();
        tx.send(AudioCmd::Load {
            token: 8,
            path: PathBuf::from("/music/b.mp3"),
            start_at: Duration::ZERO,
            paused: false,
        })
        .unwrap();

        reject_loads(rx, &events);

        let got: Vec<AudioEvent> = events_rx.try_iter().collect();
        assert_eq!(
            got,
            vec![AudioEvent::LoadFailed {
                token: 7,
                path: PathBuf::from("/music/a.mp3"),
                reason: "no audio output device".to_string(),
            }]
        );
    }

    #[test]
    fn crossfaded_track_clock_includes_the_fade() {
        let (mut deck, _events) = idle_deck(200);
        deck.swap_in(1, PathBuf::from("/music/a.mp3"), Duration::ZERO, false, Sink::new().0);

        deck.swap_in(2, PathBuf::from("/music/b.mp3"), Duration::ZERO, false, Sink::new().0);
        let elapsed = deck.info.elapsed_at(Instant::now());

        assert!(elapsed >= Duration::from_millis(200), "clock lags by {elapsed:?}");
        let shared = deck.shared.lock().unwrap();
        assert_eq!(shared.token, 2);
        assert!(shared.playing);
    }

    #[test]
    fn seek_within_a_track_does_not_crossfade() {
        let (mut deck, _events) = idle_deck(2_000);
        let path = PathBuf::from("/music/a.mp3");
        deck.swap_in(1, path.clone(), Duration::ZERO, false, Sink::new().0);

        let before = Instant::now();
        deck.swap_in(2, path, Duration::from_secs(30), false, Sink::new().0);

        assert!(before.elapsed() < Duration::from_millis(2_000));
        assert_eq!(deck.info.accumulated, Duration::from_secs(30));
    }
}
