use std::env;
use std::sync::mpsc;

use eframe::egui;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;
use crate::store::PlaylistStore;
use crate::ui;

mod event_loop;
mod mpris_sync;
mod playlist_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = settings::load_settings();

    let store_path = settings.store_path();
    let mut store = PlaylistStore::open(&store_path)?;

    // Files and folders given on the command line join the saved playlist.
    let extra = startup::collect_paths(env::args_os().skip(1), &settings.library);
    if !extra.is_empty() {
        store.append(&extra)?;
    }

    let mut app = App::new(Vec::new());
    playlist_sync::reload(&store, &mut app, &settings.library)?;
    log::info!("loaded {} tracks from {}", app.tracks.len(), store_path.display());

    let audio_player = AudioPlayer::new(settings.audio.clone());
    startup::apply_playback_defaults(&mut app, &audio_player, &settings);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(settings.ui.window_title.clone())
            .with_inner_size([960.0, 720.0])
            .with_fullscreen(settings.ui.fullscreen),
        ..Default::default()
    };
    let title = settings.ui.window_title.clone();

    let player = event_loop::PlayerApp::new(settings, store, app, audio_player, mpris, control_rx);

    eframe::run_native(
        &title,
        options,
        Box::new(|cc| {
            ui::apply_theme(&cc.egui_ctx);
            Ok(Box::new(player))
        }),
    )?;

    Ok(())
}
