use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<AudioEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<AudioEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, event_tx, playback_info.clone(), audio_settings);

        Self {
            tx,
            events: event_rx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Copy of the audio thread's current playback state.
    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    /// Events reported since the last call.
    pub fn drain_events(&self) -> Vec<AudioEvent> {
        self.events.try_iter().collect()
    }

    /// Ask the audio thread to fade out and wait for it. Safe to call twice.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
