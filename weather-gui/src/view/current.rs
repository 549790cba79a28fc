use egui::{RichText, Ui};

use crate::present::CurrentView;
use crate::state::AppState;
use crate::theme::{self, Palette};

pub fn show(ui: &mut Ui, state: &AppState, palette: &Palette) {
    super::card(ui, palette, "Current conditions", |ui| {
        let Some(report) = super::panel_body(ui, palette, &state.report, "Search for a city to begin.")
        else {
            return;
        };
        let view = CurrentView::build(report, state.prefs.units);

        ui.label(RichText::new(&view.location).size(18.0).strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            super::badge(
                ui,
                theme::condition_glyph(view.kind),
                theme::condition_color(view.kind),
                64.0,
            );
            ui.add_space(8.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(&view.temperature).size(40.0).strong());
                if !view.summary.is_empty() {
                    ui.label(RichText::new(&view.summary).size(15.0));
                }
            });
        });

        ui.add_space(6.0);
        for line in &view.details {
            ui.label(line);
        }
        if let Some(sun) = &view.sun {
            ui.label(sun);
        }
        ui.label(RichText::new(&view.observed).small().color(palette.muted));
    });
}
