use eframe::egui::{Color32, Context, Visuals};

pub const BACKGROUND: Color32 = Color32::from_rgb(0x19, 0x14, 0x14);
pub const ROW: Color32 = Color32::from_rgb(0x28, 0x28, 0x28);
pub const ACCENT: Color32 = Color32::from_rgb(0x1D, 0xB9, 0x54);
pub const ACCENT_HOVER: Color32 = Color32::from_rgb(0x1E, 0xD7, 0x60);
pub const MUTED: Color32 = Color32::from_rgb(0xB3, 0xB3, 0xB3);

/// Install the dark green-on-black look on `ctx`.
pub fn apply(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.extreme_bg_color = ROW;
    visuals.faint_bg_color = ROW;
    visuals.override_text_color = Some(Color32::WHITE);
    visuals.selection.bg_fill = ACCENT;

    visuals.widgets.inactive.weak_bg_fill = ROW;
    visuals.widgets.inactive.bg_fill = ROW;
    visuals.widgets.hovered.weak_bg_fill = ACCENT_HOVER;
    visuals.widgets.hovered.bg_fill = ACCENT_HOVER;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;

    ctx.set_visuals(visuals);
}
