use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StudentAnalyzerApp {
    pub state: AppState,
}

impl eframe::App for StudentAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: actions ----
        egui::SidePanel::left("action_panel")
            .default_width(200.0)
            .resizable(false)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table or chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
            match self.state.active_tab {
                Tab::DataTable => match &self.state.table {
                    Some(view) => table::table_view(ui, view),
                    None => {
                        ui.centered_and_justified(|ui| {
                            ui.heading("Upload a CSV to get started  (File → Open…)");
                        });
                    }
                },
                Tab::Charts => plot::chart_view(ui, &self.state),
            }
        });

        panels::subject_prompt(ctx, &mut self.state);
    }
}
