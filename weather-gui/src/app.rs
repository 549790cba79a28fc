//! The eframe application: drains worker results, runs effects, draws panels.

use crate::state::{AppState, Effect, Message};
use crate::theme::{self, Palette};
use crate::view;
use crate::worker::FetchWorker;

pub struct WeatherApp {
    state: AppState,
    worker: Option<FetchWorker>,
}

impl WeatherApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        mut worker: Option<FetchWorker>,
        initial_query: Option<String>,
    ) -> Self {
        if let Some(worker) = worker.as_mut() {
            worker.set_repaint_context(cc.egui_ctx.clone());
        }

        let mut app = Self { state, worker };
        let effects = app.state.startup(initial_query);
        app.run_effects(&cc.egui_ctx, effects);
        app
    }

    fn dispatch(&mut self, ctx: &egui::Context, message: Message) {
        let effects = self.state.update(message);
        self.run_effects(ctx, effects);
    }

    fn run_effects(&mut self, ctx: &egui::Context, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ApplyTheme(theme) => theme::apply(ctx, theme),
                Effect::SaveHistory => {
                    if let Err(e) = self.state.history.save() {
                        tracing::warn!("Failed to save search history: {e:#}");
                    }
                }
                Effect::Resolve(query) => {
                    if let Some(worker) = &self.worker {
                        worker.spawn_resolve(query);
                    }
                }
                Effect::FetchForecast { fetch, location } => {
                    if let Some(worker) = &self.worker {
                        worker.spawn_forecast(fetch, location);
                    }
                }
                Effect::FetchAirQuality { fetch, location } => {
                    if let Some(worker) = &self.worker {
                        worker.spawn_air_quality(fetch, location);
                    }
                }
            }
        }
    }

    fn notice_window(&self, ctx: &egui::Context, messages: &mut Vec<Message>) {
        let Some(notice) = &self.state.notice else {
            return;
        };

        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    messages.push(Message::DismissNotice);
                }
            });
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut messages = match &self.worker {
            Some(worker) => worker.drain(),
            None => Vec::new(),
        };
        let palette = Palette::for_theme(self.state.prefs.theme);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            view::header::show(ui, &self.state, &palette, &mut messages);
        });

        egui::SidePanel::left("conditions")
            .resizable(true)
            .default_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(8.0);
                    view::current::show(ui, &self.state, &palette);
                    ui.add_space(10.0);
                    view::air::show(ui, &self.state, &palette);
                    ui.add_space(10.0);
                    view::forecast::show(ui, &self.state, &palette);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                view::charts::show(ui, &self.state, &palette);
            });
        });

        self.notice_window(ctx, &mut messages);

        for message in messages {
            self.dispatch(ctx, message);
        }
    }
}
