use egui::{RichText, Ui};

use crate::present::ForecastRow;
use crate::state::AppState;
use crate::theme::{self, Palette};

pub fn show(ui: &mut Ui, state: &AppState, palette: &Palette) {
    super::card(ui, palette, "7-day forecast", |ui| {
        let Some(report) = super::panel_body(ui, palette, &state.report, "No forecast yet.") else {
            return;
        };
        let rows = ForecastRow::build_all(report, state.prefs.units);
        if rows.is_empty() {
            ui.label(RichText::new("No daily forecast available.").color(palette.muted));
            return;
        }

        egui::Grid::new("forecast_rows")
            .num_columns(5)
            .spacing([12.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for row in &rows {
                    super::badge(
                        ui,
                        theme::condition_glyph(row.kind),
                        theme::condition_color(row.kind),
                        22.0,
                    );
                    ui.label(RichText::new(&row.day).strong());
                    ui.label(&row.temperatures);
                    ui.label(RichText::new(&row.pop).color(theme::POP_LINE));
                    ui.label(RichText::new(&row.summary).color(palette.muted));
                    ui.end_row();
                }
            });
    });
}
