use egui::{RichText, Ui};
use weather_core::{Location, Theme, UnitSystem};

use crate::state::{AppState, Message};
use crate::theme::Palette;

/// Entries offered in the history menu.
const HISTORY_SHOWN: usize = 10;

pub fn show(ui: &mut Ui, state: &AppState, palette: &Palette, messages: &mut Vec<Message>) {
    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("MySky").size(20.0).strong().color(palette.accent));
        ui.add_space(12.0);

        let mut query = state.query.clone();
        let response = ui.add_enabled(
            state.can_fetch,
            egui::TextEdit::singleline(&mut query)
                .hint_text("City name or lat,lon")
                .desired_width(280.0),
        );
        if response.changed() {
            messages.push(Message::QueryChanged(query.clone()));
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let search = ui.add_enabled(
            state.can_fetch && !state.is_resolving(),
            egui::Button::new("Search"),
        );
        if submitted || search.clicked() {
            messages.push(Message::Search);
        }

        history_menu(ui, state, &query, messages);

        if ui
            .add_enabled(
                state.can_fetch && state.location.is_some() && !state.is_busy(),
                egui::Button::new("⟳ Refresh"),
            )
            .clicked()
        {
            messages.push(Message::Refresh);
        }

        if state.is_busy() {
            ui.spinner();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let theme_label = match state.prefs.theme {
                Theme::Dark => "☀ Light",
                Theme::Light => "🌙 Dark",
            };
            if ui.button(theme_label).clicked() {
                messages.push(Message::ToggleTheme);
            }

            let mut units = state.prefs.units;
            egui::ComboBox::from_id_salt("units")
                .selected_text(units.label())
                .show_ui(ui, |ui| {
                    for option in UnitSystem::all() {
                        ui.selectable_value(&mut units, *option, option.label());
                    }
                });
            if units != state.prefs.units {
                messages.push(Message::UnitsChanged(units));
            }
        });
    });
    if let Some(hint) = &state.search_hint {
        ui.label(RichText::new(hint).color(palette.error));
    }
    ui.add_space(6.0);
}

/// Recent searches; filtered by what is typed when that matches anything.
fn history_menu(ui: &mut Ui, state: &AppState, query: &str, messages: &mut Vec<Message>) {
    let needle = query.trim();
    let mut entries: Vec<&Location> = if needle.is_empty() {
        Vec::new()
    } else {
        state.history.matching(needle).take(HISTORY_SHOWN).collect()
    };
    if entries.is_empty() {
        entries = state.history.recent(HISTORY_SHOWN).collect();
    }

    let enabled = state.can_fetch && !entries.is_empty();
    ui.add_enabled_ui(enabled, |ui| {
        ui.menu_button("History", |ui| {
            for entry in entries {
                if ui.button(entry.label()).clicked() {
                    messages.push(Message::HistorySelected(entry.clone()));
                    ui.close_menu();
                }
            }
        });
    });
}
