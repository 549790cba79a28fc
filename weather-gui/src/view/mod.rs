//! egui rendering. Views read [`AppState`](crate::state::AppState) and push
//! [`Message`](crate::state::Message)s; they never mutate state directly.

pub mod air;
pub mod charts;
pub mod current;
pub mod forecast;
pub mod header;

use egui::{RichText, Ui};

use crate::state::{PanelError, PanelState};
use crate::theme::Palette;

const CARD_ROUNDING: f32 = 8.0;
const CARD_MARGIN: f32 = 12.0;

/// Framed card with a title, as used by every panel.
pub fn card(ui: &mut Ui, palette: &Palette, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::none()
        .rounding(CARD_ROUNDING)
        .stroke(egui::Stroke::new(1.0, palette.card_border))
        .fill(palette.card)
        .inner_margin(CARD_MARGIN)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).size(15.0).strong().color(palette.muted));
            ui.add_space(6.0);
            add_contents(ui);
        });
}

/// Draws the non-ready states of a panel. Returns the value when ready.
pub fn panel_body<'a, T>(
    ui: &mut Ui,
    palette: &Palette,
    state: &'a PanelState<T>,
    empty_text: &str,
) -> Option<&'a T> {
    match state {
        PanelState::Empty => {
            ui.label(RichText::new(empty_text).color(palette.muted));
            None
        }
        PanelState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading...").color(palette.muted));
            });
            None
        }
        PanelState::Failed(err) => {
            error_label(ui, palette, err);
            None
        }
        PanelState::Ready(value) => Some(value),
    }
}

fn error_label(ui: &mut Ui, palette: &Palette, err: &PanelError) {
    ui.label(RichText::new(format!("⚠ {}", err.title())).strong().color(palette.error));
    ui.label(RichText::new(&err.message).color(palette.error));
}

/// Filled circle with a glyph in it, tinted by condition.
pub fn badge(ui: &mut Ui, glyph: &str, color: egui::Color32, size: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), size / 2.0, color.gamma_multiply(0.25));
    painter.circle_stroke(rect.center(), size / 2.0 - 1.0, egui::Stroke::new(2.0, color));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        glyph,
        egui::FontId::proportional(size * 0.5),
        color,
    );
}
