// AgentView - ui/panels/logs.rs
//
// "Fetch Logs" button and the fetched collection, rendered as indented JSON.

use crate::app::state::ViewState;
use crate::core::format;
use crate::core::model::FetchPhase;
use crate::ui::theme;

/// Render the batch log section.
pub fn render(ui: &mut egui::Ui, state: &mut ViewState) {
    ui.horizontal(|ui| {
        if ui.button("Fetch Logs").clicked() {
            state.request_fetch_logs = true;
        }
        if state.fetch_phase == FetchPhase::Fetching {
            ui.spinner();
        }
    });

    ui.heading("Logs:");

    // Re-serialised every frame; collections are small and this keeps the
    // display trivially in sync with state.
    let json = format::collection_json(&state.logs);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::ScrollArea::both()
            .id_salt("batch_logs")
            .max_height(theme::LOGS_PANE_HEIGHT)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.label(egui::RichText::new(json).monospace());
            });
    });
}
