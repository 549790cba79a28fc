use egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints};

use crate::present::ChartSeries;
use crate::state::{AppState, PanelState};
use crate::theme::{self, Palette};

const CHART_HEIGHT: f32 = 170.0;

pub fn show(ui: &mut Ui, state: &AppState, palette: &Palette) {
    let series = match &state.report {
        PanelState::Ready(report) => Some(ChartSeries::build(report, state.prefs.units)),
        _ => None,
    };
    let title = series.as_ref().map_or("Hourly forecast", |s| s.title);

    super::card(ui, palette, title, |ui| {
        if super::panel_body(ui, palette, &state.report, "Charts appear once a forecast is loaded.")
            .is_none()
        {
            return;
        }
        let Some(series) = series else {
            return;
        };
        if series.is_empty() {
            ui.label(RichText::new("No hourly data available.").color(palette.muted));
            return;
        }

        chart(
            ui,
            &series,
            "temperature",
            &format!("Temperature ({})", series.temperature_unit),
            &series.temperature,
            theme::TEMPERATURE_LINE,
            None,
        );
        ui.add_space(8.0);
        chart(
            ui,
            &series,
            "pop",
            "Precipitation probability (%)",
            &series.pop,
            theme::POP_LINE,
            Some((0.0, 100.0)),
        );
        ui.add_space(8.0);
        chart(
            ui,
            &series,
            "wind",
            &format!("Wind speed ({})", series.wind_unit),
            &series.wind,
            theme::WIND_LINE,
            Some((0.0, 0.0)),
        );
    });
}

fn chart(
    ui: &mut Ui,
    series: &ChartSeries,
    id: &str,
    title: &str,
    points: &[[f64; 2]],
    color: Color32,
    include_y: Option<(f64, f64)>,
) {
    ui.label(RichText::new(title).strong().color(color));

    let labels = series.clone();
    let ticks = series.tick_positions();
    let step = series.tick_step as f64;
    let mut plot = Plot::new(format!("chart_{id}"))
        .height(CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_x(false)
        .x_grid_spacer(move |_input| {
            ticks
                .iter()
                .map(|&value| GridMark {
                    value,
                    step_size: step,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| labels.label_at(mark.value));
    if let Some((low, high)) = include_y {
        plot = plot.include_y(low).include_y(high);
    }

    plot.show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.to_vec()))
                .color(color)
                .width(2.0)
                .fill(0.0)
                .name(title),
        );
    });
}
