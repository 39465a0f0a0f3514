// AgentView - ui/panels/warnings.rs
//
// Non-fatal warnings window (config validation, export failures).

use crate::app::state::ViewState;

/// Render the warnings dialog (if state.show_warnings is true).
pub fn render(ctx: &egui::Context, state: &mut ViewState) {
    if !state.show_warnings {
        return;
    }

    let mut open = true;
    egui::Window::new("Warnings")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if state.warnings.is_empty() {
                ui.label("No warnings.");
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("warnings_list")
                .max_height(300.0)
                .show(ui, |ui| {
                    for warning in &state.warnings {
                        ui.label(format!("\u{2022} {warning}"));
                    }
                });
            ui.separator();
            if ui.button("Clear").clicked() {
                state.warnings.clear();
            }
        });

    if !open {
        state.show_warnings = false;
    }
}
