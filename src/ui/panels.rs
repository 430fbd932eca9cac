use eframe::egui::{self, Button, Color32, RichText, Ui};

use crate::state::{AppState, Tab};

const BUTTON_SIZE: [f32; 2] = [180.0, 30.0];

// ---------------------------------------------------------------------------
// Left side panel – action buttons
// ---------------------------------------------------------------------------

/// Render the sidebar with one button per analysis action.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Student Performance");
        ui.add_space(8.0);

        if ui.add_sized(BUTTON_SIZE, Button::new("Upload CSV")).clicked() {
            open_file_dialog(state);
        }
        ui.separator();

        let loaded = state.analyzer.is_some();
        ui.add_enabled_ui(loaded, |ui: &mut Ui| {
            ui.strong("Tables");
            if ui.add_sized(BUTTON_SIZE, Button::new("Show Data")).clicked() {
                state.show_data();
            }
            if ui.add_sized(BUTTON_SIZE, Button::new("Show Averages")).clicked() {
                state.show_averages();
            }
            if ui.add_sized(BUTTON_SIZE, Button::new("Top Performers")).clicked() {
                state.show_top();
            }
            if ui.add_sized(BUTTON_SIZE, Button::new("Percentiles")).clicked() {
                state.show_percentiles();
            }

            ui.add_space(8.0);
            ui.strong("Charts");
            if ui.add_sized(BUTTON_SIZE, Button::new("Subject Averages")).clicked() {
                state.plot_averages();
            }
            if ui.add_sized(BUTTON_SIZE, Button::new("Subject Distribution")).clicked() {
                state.ask_subject();
            }
            if ui.add_sized(BUTTON_SIZE, Button::new("Grade Breakdown")).clicked() {
                state.plot_grades();
            }
        });

        if !loaded {
            ui.add_space(8.0);
            ui.label("No dataset loaded.");
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(analyzer), Some(path)) = (&state.analyzer, &state.source) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} students, {} subjects",
                analyzer.table().len(),
                analyzer.subjects().len()
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.is_error {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(&msg.text).color(color));
        }
    });
}

/// Tab strip above the central panel.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .selectable_label(state.active_tab == Tab::DataTable, "Data Table")
            .clicked()
        {
            state.active_tab = Tab::DataTable;
        }
        if ui
            .selectable_label(state.active_tab == Tab::Charts, "Charts")
            .clicked()
        {
            state.active_tab = Tab::Charts;
        }
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// Subject prompt
// ---------------------------------------------------------------------------

/// Small window asking which column to plot. Shown while
/// `state.subject_prompt` is `Some`.
pub fn subject_prompt(ctx: &egui::Context, state: &mut AppState) {
    let Some(mut text) = state.subject_prompt.clone() else {
        return;
    };
    let subjects = state
        .analyzer
        .as_ref()
        .map(|a| a.subjects().join(", "))
        .unwrap_or_default();

    let mut open = true;
    let mut submit = false;
    egui::Window::new("Choose Subject")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.label("Enter Subject Name:");
            let response = ui.text_edit_singleline(&mut text);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.small(format!("Available: {subjects}"));
            if ui.button("Plot").clicked() {
                submit = true;
            }
        });

    if !open {
        state.subject_prompt = None;
        return;
    }
    state.subject_prompt = Some(text.clone());
    if submit {
        state.plot_distribution(&text);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student scores")
        .add_filter("CSV Files", &["csv"])
        .add_filter("Tab separated", &["tsv", "txt"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.load_path(&path);
    }
}
