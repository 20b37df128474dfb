use std::time::Duration;

use eframe::egui::{Button, Slider, Ui};

use crate::app::App;

use super::{UiAction, format_mmss};

const VOLUME_STEP: f64 = 0.1;

pub(super) fn show(
    ui: &mut Ui,
    app: &App,
    seek_preview: &mut Option<f32>,
    actions: &mut Vec<UiAction>,
) {
    ui.add_space(4.0);
    transport_buttons(ui, app, actions);
    seek_bar(ui, app, seek_preview, actions);
    volume_slider(ui, app, actions);
    ui.add_space(4.0);
}

fn transport_buttons(ui: &mut Ui, app: &App, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        let mut button = |ui: &mut Ui, label: &str, action: UiAction| {
            if ui.button(label).clicked() {
                actions.push(action);
            }
        };

        button(ui, "Play", UiAction::PlayFirst);
        let pause_label = if app.is_paused() { "Resume" } else { "Pause" };
        button(ui, pause_label, UiAction::TogglePause);
        button(ui, "Stop", UiAction::Stop);
        button(ui, "Prev", UiAction::Prev);
        button(ui, "Next", UiAction::Next);
        ui.separator();
        button(ui, "Add", UiAction::AddFiles);
        button(ui, "Add Folder", UiAction::AddFolder);
        if ui
            .add_enabled(app.current.is_some(), Button::new("Delete"))
            .clicked()
        {
            actions.push(UiAction::RemoveCurrent);
        }
        ui.separator();
        if ui.add(Button::new("Repeat").selected(app.repeat)).clicked() {
            actions.push(UiAction::ToggleRepeat);
        }
        if ui
            .add_enabled(app.has_tracks(), Button::new("Shuffle"))
            .clicked()
        {
            actions.push(UiAction::Shuffle);
        }
    });
}

/// Elapsed label, seek slider and total label. The seek is sent once the
/// slider is released; while it is held only the preview moves.
fn seek_bar(ui: &mut Ui, app: &App, seek_preview: &mut Option<f32>, actions: &mut Vec<UiAction>) {
    let total = app.total().unwrap_or_default();
    let total_secs = total.as_secs_f32();

    ui.horizontal(|ui| {
        let mut value = seek_preview
            .unwrap_or_else(|| app.position.as_secs_f32())
            .min(total_secs);

        ui.label(format_mmss(secs(value)));
        ui.spacing_mut().slider_width = (ui.available_width() - 60.0).max(100.0);
        let response = ui.add_enabled(
            total_secs > 0.0,
            Slider::new(&mut value, 0.0..=total_secs).show_value(false),
        );
        ui.label(format_mmss(total));

        let gesture = SeekGesture {
            held: response.is_pointer_button_down_on() || response.dragged(),
            released: response.clicked() || response.drag_stopped(),
        };
        if let Some(pos) = seek_on_release(gesture, value, seek_preview) {
            actions.push(UiAction::Seek(pos));
        }
    });
}

/// Pointer state of the seek slider in one frame.
#[derive(Clone, Copy, Debug, Default)]
struct SeekGesture {
    held: bool,
    released: bool,
}

/// Track the slider in the preview while it is held; seek once on release.
fn seek_on_release(gesture: SeekGesture, value: f32, preview: &mut Option<f32>) -> Option<Duration> {
    if gesture.released {
        *preview = None;
        return Some(secs(value));
    }
    if gesture.held {
        *preview = Some(value);
    }
    None
}

fn volume_slider(ui: &mut Ui, app: &App, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.label("Volume");
        let mut volume = app.volume;
        let response = ui.add(
            Slider::new(&mut volume, 0.0..=1.0)
                .step_by(VOLUME_STEP)
                .fixed_decimals(1),
        );
        if response.changed() {
            actions.push(UiAction::SetVolume(volume));
        }
    });
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELD: SeekGesture = SeekGesture {
        held: true,
        released: false,
    };
    const RELEASED: SeekGesture = SeekGesture {
        held: false,
        released: true,
    };

    #[test]
    fn press_drag_release_seeks_once() {
        let mut preview = None;
        let frames = [(HELD, 10.0), (HELD, 25.0), (HELD, 40.0), (RELEASED, 40.0)];

        let seeks: Vec<Duration> = frames
            .into_iter()
            .filter_map(|(gesture, value)| seek_on_release(gesture, value, &mut preview))
            .collect();

        assert_eq!(seeks, vec![Duration::from_secs(40)]);
        assert_eq!(preview, None);
    }

    #[test]
    fn press_moves_preview_without_seeking() {
        let mut preview = None;
        assert_eq!(seek_on_release(HELD, 12.5, &mut preview), None);
        assert_eq!(preview, Some(12.5));

        assert_eq!(
            seek_on_release(RELEASED, 12.5, &mut preview),
            Some(Duration::from_millis(12_500))
        );
    }

    #[test]
    fn idle_frames_leave_preview_alone() {
        let mut preview = Some(3.0);
        assert_eq!(seek_on_release(SeekGesture::default(), 99.0, &mut preview), None);
        assert_eq!(preview, Some(3.0));
    }
}
