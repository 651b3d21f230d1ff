use eframe::egui::{self, Grid, RichText, ScrollArea, Ui};

use product_lens::charts::Figure;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset facts
// ---------------------------------------------------------------------------

/// Render the left summary panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Dataset");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("{} products", state.n_rows));
            ui.add_space(4.0);

            egui::CollapsingHeader::new(RichText::new("Columns").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for col in &state.columns {
                        ui.label(col);
                    }
                });

            ui.separator();
            ui.strong("Average reviews per rating");
            Grid::new("reviews_per_rating")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (rating, mean) in &state.reviews_per_rating {
                        let text = RichText::new(rating.to_string())
                            .color(state.rating_colors.color_for(rating));
                        ui.label(text);
                        ui.label(format!("{mean:.1}"));
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the figure selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        for figure in Figure::ALL {
            if ui
                .selectable_label(state.figure == figure, figure.title())
                .clicked()
            {
                state.select(figure);
            }
        }
    });
}
