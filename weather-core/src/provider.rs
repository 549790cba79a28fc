use crate::{
    Config,
    error::WeatherError,
    model::{AirQualityReading, Location, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of weather records for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidate locations for a free-form place name, best match first.
    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError>;

    /// Current conditions, 7-day forecast and 48-hour series in one report.
    async fn forecast(&self, location: &Location) -> Result<WeatherReport, WeatherError>;

    async fn air_quality(&self, location: &Location) -> Result<AirQualityReading, WeatherError>;

    /// Coordinates are used as-is; names resolve to the first geocoding
    /// candidate. `Ok(None)` means nothing matched.
    async fn resolve(&self, query: &str) -> Result<Option<Location>, WeatherError> {
        if let Some(location) = Location::parse_coordinates(query) {
            return Ok(Some(location));
        }
        Ok(self.geocode(query).await?.into_iter().next())
    }
}

/// Construct the OpenWeather provider from config, resolving the API key
/// from the environment or the config file.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key()?;
    Ok(Box::new(
        OpenWeatherProvider::new(api_key).with_lang(config.lang.clone()),
    ))
}
