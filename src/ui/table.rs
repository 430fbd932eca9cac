use eframe::egui::{Align, Layout, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::TableView;

// ---------------------------------------------------------------------------
// Data table (central panel, "Data Table" tab)
// ---------------------------------------------------------------------------

/// Render a [`TableView`] as a striped, resizable grid.
pub fn table_view(ui: &mut Ui, view: &TableView) {
    if view.rows.is_empty() {
        ui.label("No rows to show.");
    }

    // Column widths are remembered per header, so key the table on it.
    ui.push_id(&view.columns, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(Column::auto().at_least(90.0), view.columns.len())
                .header(22.0, |mut header| {
                    for col in &view.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col);
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, view.rows.len(), |mut row| {
                        let cells = &view.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
    });
}
