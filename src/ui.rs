//! Widget tree for the player window.
//!
//! `draw` renders the whole window from an immutable view of `App` and
//! returns the `UiAction`s the user triggered this frame. Nothing here talks
//! to the audio thread or the store; the runtime dispatches the actions.

use std::time::Duration;

use eframe::egui::{self, CentralPanel, Context, TopBottomPanel};

use crate::app::App;
use crate::config::UiSettings;
use crate::library::{Track, display_from_fields};

mod artwork;
mod controls;
mod now_playing;
mod playlist;
mod theme;

pub use artwork::ArtworkCache;
pub use theme::apply as apply_theme;

/// Everything a widget, shortcut or media key can ask the player to do.
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    PlayIndex(usize),
    PlayFirst,
    PlayCurrent,
    TogglePause,
    Pause,
    Resume,
    Stop,
    Next,
    Prev,
    SelectNext,
    SelectPrev,
    Seek(Duration),
    SetVolume(f32),
    VolumeUp,
    VolumeDown,
    ToggleRepeat,
    Shuffle,
    AddFiles,
    AddFolder,
    RemoveCurrent,
    ToggleFullscreen,
    LeaveFullscreen,
    Raise,
    Quit,
}

/// Format a `Duration` as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// "Now Playing: ..." line for the loaded track.
pub fn now_playing_text(track: Option<&Track>, ui: &UiSettings) -> String {
    let Some(t) = track else {
        return "Nothing playing".to_string();
    };
    let name = display_from_fields(
        &t.path,
        &t.title,
        t.artist.as_deref(),
        t.album.as_deref(),
        &ui.now_playing_track_fields,
        &ui.now_playing_track_separator,
    );
    format!("{}{name}", ui.now_playing_prefix)
}

/// Render the window and collect the actions triggered this frame.
///
/// `scroll_to` brings a playlist row into view; `seek_preview` holds the
/// seek slider value while it is being dragged.
pub fn draw(
    ctx: &Context,
    app: &App,
    art: &mut ArtworkCache,
    scroll_to: Option<usize>,
    seek_preview: &mut Option<f32>,
    settings: &UiSettings,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    TopBottomPanel::top("header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Some(logo) = art.logo(ctx) {
                let sized = egui::load::SizedTexture::from_handle(&logo);
                ui.add(egui::Image::new(sized).max_height(48.0));
            }
            ui.heading(settings.header_text.as_str());
        });
    });

    TopBottomPanel::top("now_playing").show(ctx, |ui| {
        now_playing::show(ui, app, art, settings);
    });

    TopBottomPanel::bottom("controls").show(ctx, |ui| {
        controls::show(ui, app, seek_preview, &mut actions);
    });

    CentralPanel::default().show(ctx, |ui| {
        playlist::show(ui, app, art, scroll_to, &mut actions);
    });

    actions
}

#[cfg(test)]
mod tests;
