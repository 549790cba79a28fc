//! Binary crate for the `mysky` desktop weather viewer.
//!
//! This crate focuses on:
//! - Parsing command-line options and initializing logging
//! - Running fetches off the UI thread
//! - Rendering panels and charts with egui

use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, SearchHistory, provider_from_config};

mod app;
mod cli;
mod present;
mod state;
mod theme;
mod view;
mod worker;

use state::{AppState, Notice};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.log_level());

    Config::load_dotenv();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let (config, mut startup_notice) = match loaded {
        Ok(config) => (config, None),
        Err(e) => {
            tracing::warn!("Using default settings: {e:#}");
            (
                Config::default(),
                Some(Notice::new("Configuration error", format!("{e:#}"))),
            )
        }
    };

    let history = SearchHistory::load().unwrap_or_else(|e| {
        tracing::warn!("Search history unavailable: {e:#}");
        SearchHistory::in_memory()
    });

    let worker = match provider_from_config(&config) {
        Ok(provider) => Some(worker::FetchWorker::new(Arc::from(provider))?),
        Err(e) => {
            tracing::warn!("Searching disabled: {e}");
            startup_notice.get_or_insert_with(|| Notice::new("Configuration error", e.to_string()));
            None
        }
    };

    let mut state = AppState::new(config.preferences(), history, worker.is_some());
    if let Some(notice) = startup_notice {
        state.set_notice(notice);
    }
    let initial_query = cli.city.or(config.default_location);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("MySky"),
        ..Default::default()
    };

    eframe::run_native(
        "MySky",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::WeatherApp::new(
                cc,
                state,
                worker,
                initial_query,
            )))
        }),
    )
    .map_err(|e| anyhow!("Application error: {e}"))
}

/// `RUST_LOG` wins; otherwise `default_level` applies.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
