use eframe::egui::{Frame, Image, RichText, Ui, Vec2};

use crate::app::{App, PlaybackState};
use crate::config::UiSettings;

use super::artwork::ArtworkCache;
use super::{now_playing_text, theme};

pub(super) fn show(ui: &mut Ui, app: &App, art: &mut ArtworkCache, settings: &UiSettings) {
    let size = Vec2::splat(art.cover_size() as f32);

    ui.horizontal(|ui| {
        let cover = app
            .now_playing
            .as_ref()
            .and_then(|t| art.cover(ui.ctx(), &t.path));

        match cover {
            Some(tex) => {
                ui.add(Image::new((tex.id(), size)));
            }
            None => {
                Frame::default().fill(theme::ROW).show(ui, |ui| {
                    ui.set_min_size(size);
                    ui.set_max_size(size);
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("No Album Art").color(theme::MUTED));
                    });
                });
            }
        }

        ui.vertical(|ui| {
            ui.heading(now_playing_text(app.now_playing.as_ref(), settings));

            let state = match app.playback {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Stopped => "Stopped",
            };
            ui.label(RichText::new(state).color(theme::MUTED));

            if let Some(album) = app.now_playing.as_ref().and_then(|t| t.album.as_deref()) {
                ui.label(RichText::new(album).color(theme::MUTED));
            }
            if app.repeat {
                ui.label(RichText::new("Repeat on").color(theme::ACCENT));
            }
        });
    });
}
