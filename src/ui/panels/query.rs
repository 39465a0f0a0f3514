// AgentView - ui/panels/query.rs
//
// Query input, Submit button, and the response area.

use crate::app::state::ViewState;
use crate::core::model::SubmitPhase;
use crate::ui::theme;

/// Render the query section.
pub fn render(ui: &mut egui::Ui, state: &mut ViewState) {
    ui.horizontal(|ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.query)
                .hint_text("Enter your query")
                .desired_width(theme::QUERY_INPUT_WIDTH),
        );
        let enter_pressed =
            input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Submit").clicked() || enter_pressed {
            state.request_submit = true;
        }

        if state.submit_phase == SubmitPhase::Submitting {
            ui.spinner();
        }
    });

    ui.add_space(8.0);
    ui.heading("Response:");

    let text = egui::RichText::new(&state.response);
    if state.submit_phase == SubmitPhase::ShowingError {
        ui.label(text.color(theme::ERROR_COLOUR));
    } else {
        ui.label(text);
    }
}
