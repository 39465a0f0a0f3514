// AgentView - gui.rs
//
// Top-level eframe::App implementation.
// Wires the panels to the QueryView and drives its per-frame polling.

use crate::app::view::QueryView;
use crate::core::model::{FetchPhase, LiveStatus, SubmitPhase};
use crate::ui;
use crate::util::constants;
use std::time::Duration;

/// The AgentView application.
pub struct AgentViewApp {
    pub view: QueryView,
}

impl AgentViewApp {
    /// Create the app and mount the view (opens the live subscription).
    pub fn new(mut view: QueryView) -> Self {
        view.mount();
        Self { view }
    }

    fn export_logs(&mut self) {
        let Some(dest) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("logs.json")
            .save_file()
        else {
            return;
        };

        let state = &mut self.view.state;
        match crate::core::export::export_json_file(&state.logs, &dest) {
            Ok(n) => {
                state.status_message = format!("Exported {n} record(s) to JSON.");
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                state.status_message = format!("Export failed: {e}");
                state.warnings.push(e.to_string());
            }
        }
    }
}

impl eframe::App for AgentViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply requests raised by panels last frame, then drain worker results.
        self.view.handle_requests();
        if self.view.poll() {
            ctx.request_repaint();
        }

        // Workers only report during a frame, so keep frames coming while
        // anything is in flight or the stream is open.
        if self.view.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if self.view.is_mounted() {
            ctx.request_repaint_after(Duration::from_millis(
                constants::LIVE_REPAINT_INTERVAL_MS,
            ));
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let has_logs = !self.view.state.logs.is_empty();
                    ui.add_enabled_ui(has_logs, |ui| {
                        if ui.button("Export Logs as JSON\u{2026}").clicked() {
                            self.export_logs();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let live_enabled = self.view.state.live_enabled;
                    ui.add_enabled_ui(live_enabled, |ui| {
                        if ui.button("Reconnect Live Logs").clicked() {
                            self.view.state.request_reconnect = true;
                            ui.close_menu();
                        }
                        if ui.button("Clear Live Logs").clicked() {
                            self.view.state.request_clear_live = true;
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    let label = format!("Warnings ({})", self.view.state.warnings.len());
                    if ui.button(label).clicked() {
                        self.view.state.show_warnings = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let state = &self.view.state;
            ui.horizontal(|ui| {
                if state.live_status == LiveStatus::Connected {
                    ui.label(
                        egui::RichText::new(" \u{25cf} LIVE ")
                            .strong()
                            .color(ui::theme::LIVE_COLOUR)
                            .background_color(egui::Color32::from_rgba_premultiplied(
                                34, 197, 94, 30,
                            )),
                    );
                    ui.separator();
                }
                ui.label(&state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(&state.base_url);
                    ui.separator();
                    if state.live_enabled {
                        ui.label(format!("{} live", state.live_logs.len()));
                    }
                    ui.label(format!("{} fetched", state.logs.len()));
                    if state.fetch_phase == FetchPhase::Fetching {
                        ui.label("fetching\u{2026}");
                    }
                    if state.submit_phase != SubmitPhase::Idle {
                        ui.label(state.submit_phase.label());
                    }
                    if state.debug_mode {
                        ui.label("DEBUG");
                    }
                });
            });
        });

        // Central panel: query, batch logs, live logs.
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(constants::VIEW_HEADING);
            ui.add_space(8.0);
            ui::panels::query::render(ui, &mut self.view.state);
            ui.add_space(12.0);
            ui::panels::logs::render(ui, &mut self.view.state);
            ui.add_space(12.0);
            ui::panels::live::render(ui, &mut self.view.state);
        });

        ui::panels::warnings::render(ctx, &mut self.view.state);
    }

    /// Called by eframe when the application window is about to close.
    ///
    /// Releases the live subscription.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.view.unmount();
    }
}
