// AgentView - ui/panels/live.rs
//
// Real-time log updates: one block per received entry, newest at the bottom.

use crate::app::state::ViewState;
use crate::core::format;
use crate::core::model::LiveStatus;
use crate::ui::theme;

/// Render the live log section. Nothing is drawn when live logs are disabled.
pub fn render(ui: &mut egui::Ui, state: &mut ViewState) {
    if !state.live_enabled {
        return;
    }

    ui.horizontal(|ui| {
        ui.heading("Real-Time Log Updates:");
        if state.live_status == LiveStatus::Disconnected
            && ui.small_button("Reconnect").clicked()
        {
            state.request_reconnect = true;
        }
        if !state.live_logs.is_empty() && ui.small_button("Clear").clicked() {
            state.request_clear_live = true;
        }
    });

    if let Some(ref reason) = state.live_error {
        ui.colored_label(theme::ERROR_COLOUR, format!("Disconnected: {reason}"));
    }

    egui::ScrollArea::vertical()
        .id_salt("live_logs")
        .min_scrolled_height(theme::LIVE_PANE_MIN_HEIGHT)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in &state.live_logs {
                ui.horizontal(|ui| {
                    ui.strong(format::record_heading(&entry.record));
                    ui.label(
                        egui::RichText::new(entry.received_at.format("%H:%M:%S").to_string())
                            .small()
                            .color(theme::MUTED_COLOUR),
                    );
                });
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(format::joined_lines(&entry.record)).monospace());
                });
                ui.add_space(4.0);
            }
        });
}
