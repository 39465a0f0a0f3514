// AgentView - ui/theme.rs
//
// Colour scheme, visuals setup, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// LIVE badge colour while the stream is connected.
pub const LIVE_COLOUR: Color32 = Color32::from_rgb(34, 197, 94); // Green 500

/// Colour used for failure text (fallback response, disconnect reason).
pub const ERROR_COLOUR: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Colour for secondary text such as arrival timestamps.
pub const MUTED_COLOUR: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Layout constants.
pub const QUERY_INPUT_WIDTH: f32 = 300.0;
pub const LOGS_PANE_HEIGHT: f32 = 260.0;
pub const LIVE_PANE_MIN_HEIGHT: f32 = 160.0;

/// Apply dark/light visuals and scale every text style from `font_size`.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Heading => font_size * 1.5,
                egui::TextStyle::Small => font_size * 0.8,
                _ => font_size,
            };
        }
    });
}
