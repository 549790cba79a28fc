//! Core library for the MySky weather viewer.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - Shared domain models (snapshot, air quality, forecast, hourly series)
//! - Display preferences and render-time unit conversion
//! - Persisted search history
//!
//! It is used by `weather-gui`, but has no dependency on any GUI toolkit.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod prefs;
pub mod provider;
pub mod units;

pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use history::SearchHistory;
pub use model::{
    AirQualityReading, AqiLevel, Condition, ConditionKind, ForecastDay, HourlyPoint, Location,
    ReportSource, WeatherReport, WeatherSnapshot,
};
pub use prefs::{DisplayPreferences, Theme, UnitSystem};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
