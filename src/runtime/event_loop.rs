use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use eframe::egui::{self, Key, Modifiers, ViewportCommand};
use rfd::FileDialog;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::scan;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSync, update_mpris};
use crate::runtime::playlist_sync;
use crate::store::PlaylistStore;
use crate::ui::{self, ArtworkCache, UiAction};

/// Fires at most once per `interval`, the first time immediately.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    last: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Window-level shortcuts, checked in this order every frame.
const SHORTCUTS: [Key; 14] = [
    Key::Space,
    Key::ArrowRight,
    Key::ArrowLeft,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::Escape,
    Key::Enter,
    Key::R,
    Key::S,
    Key::Plus,
    Key::Equals,
    Key::Minus,
    Key::F11,
    Key::Delete,
];

/// Map a pressed key to the actions it triggers.
pub fn actions_for_key(key: Key) -> Vec<UiAction> {
    match key {
        Key::Space => vec![UiAction::TogglePause],
        Key::ArrowRight => vec![UiAction::Next],
        Key::ArrowLeft => vec![UiAction::Prev],
        Key::ArrowUp => vec![UiAction::SelectPrev],
        Key::ArrowDown => vec![UiAction::SelectNext],
        Key::Escape => vec![UiAction::Stop, UiAction::LeaveFullscreen],
        Key::Enter => vec![UiAction::PlayCurrent],
        Key::R => vec![UiAction::ToggleRepeat],
        Key::S => vec![UiAction::Shuffle],
        Key::Plus | Key::Equals => vec![UiAction::VolumeUp],
        Key::Minus => vec![UiAction::VolumeDown],
        Key::F11 => vec![UiAction::ToggleFullscreen],
        Key::Delete => vec![UiAction::RemoveCurrent],
        _ => Vec::new(),
    }
}

/// Consume shortcut key presses before widgets see them.
fn keyboard_actions(ctx: &egui::Context) -> Vec<UiAction> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input_mut(|i| {
        SHORTCUTS
            .iter()
            .filter(|&&key| i.consume_key(Modifiers::NONE, key))
            .flat_map(|&key| actions_for_key(key))
            .collect()
    })
}

impl From<ControlCmd> for UiAction {
    fn from(cmd: ControlCmd) -> Self {
        match cmd {
            ControlCmd::Quit => UiAction::Quit,
            ControlCmd::Raise => UiAction::Raise,
            ControlCmd::Play => UiAction::Resume,
            ControlCmd::Pause => UiAction::Pause,
            ControlCmd::PlayPause => UiAction::TogglePause,
            ControlCmd::Stop => UiAction::Stop,
            ControlCmd::Next => UiAction::Next,
            ControlCmd::Prev => UiAction::Prev,
        }
    }
}

/// The eframe application: owns the model, the store and the audio thread.
pub struct PlayerApp {
    settings: config::Settings,
    store: PlaylistStore,
    app: App,
    audio: AudioPlayer,
    mpris: MprisHandle,
    mpris_sync: MprisSync,
    control_rx: Receiver<ControlCmd>,
    artwork: ArtworkCache,
    position_ticker: Ticker,
    end_ticker: Ticker,
    seek_preview: Option<f32>,
}

impl PlayerApp {
    pub fn new(
        settings: config::Settings,
        store: PlaylistStore,
        app: App,
        audio: AudioPlayer,
        mpris: MprisHandle,
        control_rx: Receiver<ControlCmd>,
    ) -> Self {
        let artwork = ArtworkCache::new(
            settings.ui.thumbnail_size,
            settings.ui.cover_size,
            settings.ui.logo_path.clone(),
        );
        let position_ticker = Ticker::new(Duration::from_millis(settings.playback.position_poll_ms));
        let end_ticker = Ticker::new(Duration::from_millis(settings.playback.end_check_ms));

        Self {
            settings,
            store,
            app,
            audio,
            mpris,
            mpris_sync: MprisSync::default(),
            control_rx,
            artwork,
            position_ticker,
            end_ticker,
            seek_preview: None,
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.audio.send(cmd) {
            log::error!("audio thread is gone: {e}");
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, action: UiAction, now: Instant) {
        log::debug!("action {action:?}");
        let cmd = match action {
            UiAction::PlayIndex(i) => self.app.play(i, now),
            UiAction::PlayFirst => self.app.play_first(now),
            UiAction::PlayCurrent => self.app.play_current_or_first(now),
            UiAction::TogglePause => self.app.toggle_pause(now),
            UiAction::Pause => self.app.pause(),
            UiAction::Resume => self.app.resume(now),
            UiAction::Stop => Some(self.app.stop()),
            UiAction::Next => self.app.next(now),
            UiAction::Prev => self.app.prev(now),
            UiAction::SelectNext => {
                self.app.select_next();
                None
            }
            UiAction::SelectPrev => {
                self.app.select_prev();
                None
            }
            UiAction::Seek(pos) => self.app.seek_to(pos, now),
            UiAction::SetVolume(v) => Some(self.app.set_volume(v)),
            UiAction::VolumeUp => Some(self.app.volume_up()),
            UiAction::VolumeDown => Some(self.app.volume_down()),
            UiAction::ToggleRepeat => {
                self.app.toggle_repeat();
                None
            }
            UiAction::Shuffle => self.app.play_random(now, &mut rand::rng()),
            UiAction::AddFiles => {
                self.add_files();
                None
            }
            UiAction::AddFolder => {
                self.add_folder();
                None
            }
            UiAction::RemoveCurrent => {
                self.remove_current();
                None
            }
            UiAction::ToggleFullscreen => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
                None
            }
            UiAction::LeaveFullscreen => {
                ctx.send_viewport_cmd(ViewportCommand::Fullscreen(false));
                None
            }
            UiAction::Raise => {
                ctx.send_viewport_cmd(ViewportCommand::Focus);
                None
            }
            UiAction::Quit => {
                ctx.send_viewport_cmd(ViewportCommand::Close);
                None
            }
        };

        if let Some(cmd) = cmd {
            self.send(cmd);
        }
    }

    fn add_files(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Audio files", self.settings.library.extensions.as_slice())
            .pick_files();
        if let Some(paths) = picked {
            self.append(&paths);
        }
    }

    fn add_folder(&mut self) {
        let Some(dir) = FileDialog::new().pick_folder() else {
            return;
        };
        let paths = scan(&dir, &self.settings.library);
        if paths.is_empty() {
            log::info!("no audio files under {}", dir.display());
            return;
        }
        self.append(&paths);
    }

    fn append(&mut self, paths: &[PathBuf]) {
        match playlist_sync::append(&mut self.store, &mut self.app, paths, &self.settings.library) {
            Ok(n) => {
                log::info!("added {n} tracks");
                self.forget_stale_artwork();
            }
            Err(e) => log::error!("failed to add tracks: {e}"),
        }
    }

    fn remove_current(&mut self) {
        match playlist_sync::remove_current(&mut self.store, &mut self.app, &self.settings.library)
        {
            Ok(_) => self.forget_stale_artwork(),
            Err(e) => log::error!("failed to remove track: {e}"),
        }
    }

    fn forget_stale_artwork(&mut self) {
        self.artwork.retain(self.app.tracks.iter().map(|t| &t.path));
    }

    /// Drain MPRIS commands and run both tickers.
    fn poll(&mut self, ctx: &egui::Context, now: Instant) {
        let controls: Vec<ControlCmd> = self.control_rx.try_iter().collect();
        for cmd in controls {
            self.dispatch(ctx, cmd.into(), now);
        }

        if self.position_ticker.due(now) {
            let info = self.audio.snapshot();
            self.app.refresh_position(&info, now);
        }

        if self.end_ticker.due(now) {
            for event in self.audio.drain_events() {
                if let Some(cmd) = self.app.handle_event(event, now) {
                    self.send(cmd);
                }
            }
        }
    }

    fn repaint_interval(&self) -> Duration {
        self.position_ticker
            .interval()
            .min(self.end_ticker.interval())
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll(ctx, now);

        for action in keyboard_actions(ctx) {
            self.dispatch(ctx, action, now);
        }

        let scroll_to = self.app.take_scroll_request();
        let actions = ui::draw(
            ctx,
            &self.app,
            &mut self.artwork,
            scroll_to,
            &mut self.seek_preview,
            &self.settings.ui,
        );
        let acted = !actions.is_empty();
        for action in actions {
            self.dispatch(ctx, action, Instant::now());
        }

        if self.mpris_sync.needs_update(&self.app) {
            update_mpris(&self.mpris, &self.app);
        }

        if acted {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.repaint_interval());
        }
    }
}

impl Drop for PlayerApp {
    fn drop(&mut self) {
        self.audio
            .quit_softly(Duration::from_millis(self.settings.audio.quit_fade_out_ms));
    }
}
