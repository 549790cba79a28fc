use egui::{RichText, Ui};

use crate::present::AirView;
use crate::state::AppState;
use crate::theme::{self, Palette};

pub fn show(ui: &mut Ui, state: &AppState, palette: &Palette) {
    super::card(ui, palette, "Air quality", |ui| {
        let Some(reading) = super::panel_body(ui, palette, &state.air, "No air quality data yet.")
        else {
            return;
        };
        let view = AirView::build(reading);
        let color = theme::aqi_color(view.level);

        ui.horizontal(|ui| {
            ui.label(RichText::new(&view.headline).size(18.0).strong());
            ui.add_space(8.0);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter().circle_filled(rect.center(), 7.0, color);
            ui.label(RichText::new(&view.level_label).color(color).strong());
        });

        ui.add(
            egui::ProgressBar::new(f32::from(view.percent) / 100.0)
                .fill(color)
                .desired_height(10.0),
        );

        ui.add_space(4.0);
        for line in &view.pollutants {
            ui.label(RichText::new(line).small());
        }
    });
}
