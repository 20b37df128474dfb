use eframe::egui::{Frame, Image, Label, Margin, RichText, ScrollArea, Sense, Ui, Vec2};

use crate::app::App;

use super::artwork::ArtworkCache;
use super::{UiAction, theme};

const ROW_PAD_X: i8 = 8;
const ROW_PAD_Y: i8 = 4;

pub(super) fn show(
    ui: &mut Ui,
    app: &App,
    art: &mut ArtworkCache,
    scroll_to: Option<usize>,
    actions: &mut Vec<UiAction>,
) {
    if app.tracks.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Playlist is empty. Use Add or Add Folder.").color(theme::MUTED));
        });
        return;
    }

    let thumb = art.thumbnail_size() as f32;
    let row_height = thumb + 2.0 * f32::from(ROW_PAD_Y);
    let spacing = ui.spacing().item_spacing.y;

    let mut area = ScrollArea::vertical().auto_shrink([false; 2]);
    if let Some(i) = scroll_to {
        let view = ui.available_height();
        let offset = i as f32 * (row_height + spacing) - (view - row_height) / 2.0;
        area = area.vertical_scroll_offset(offset.max(0.0));
    }

    area.show_rows(ui, row_height, app.tracks.len(), |ui, rows| {
        for i in rows {
            let track = &app.tracks[i];
            let tex = art.thumbnail(ui.ctx(), &track.path);
            let fill = if app.current == Some(i) {
                theme::ACCENT
            } else {
                theme::ROW
            };

            let response = Frame::default()
                .fill(fill)
                .inner_margin(Margin::symmetric(ROW_PAD_X, ROW_PAD_Y))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.add(Image::new((tex.id(), Vec2::splat(thumb))));
                        ui.add(Label::new(track.display.as_str()).selectable(false).truncate());
                    });
                })
                .response
                .interact(Sense::click());

            if response.clicked() {
                actions.push(UiAction::PlayIndex(i));
            }
        }
    });
}
