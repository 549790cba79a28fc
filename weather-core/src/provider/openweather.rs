use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::{collections::BTreeMap, time::Duration as StdDuration};

use crate::{
    config::DEFAULT_LANG,
    error::WeatherError,
    model::{
        AirQualityReading, Condition, FORECAST_DAYS, ForecastDay, HOURLY_WINDOW, HourlyPoint,
        Location, ReportSource, WeatherReport, WeatherSnapshot, from_unix, to_local,
    },
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const ONECALL_PATH: &str = "/data/2.5/onecall";
const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// Candidates requested from the geocoding endpoint.
pub const GEOCODING_LIMIT: u8 = 5;

const GEOCODING_TIMEOUT: StdDuration = StdDuration::from_secs(12);
const ONECALL_TIMEOUT: StdDuration = StdDuration::from_secs(14);
const CURRENT_TIMEOUT: StdDuration = StdDuration::from_secs(12);
const FORECAST_TIMEOUT: StdDuration = StdDuration::from_secs(14);
const AIR_TIMEOUT: StdDuration = StdDuration::from_secs(12);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            lang: DEFAULT_LANG.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    async fn get_body(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
        timeout: StdDuration,
    ) -> Result<String, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint, %url, ?params, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| WeatherError::Network {
                context: "Failed to send request to OpenWeather",
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Network {
            context: "Failed to read OpenWeather response body",
            source,
        })?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    fn coordinate_params(&self, location: &Location) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
        ]
    }

    fn weather_params(&self, location: &Location) -> Vec<(&'static str, String)> {
        let mut params = self.coordinate_params(location);
        params.push(("units", "metric".to_string()));
        params.push(("lang", self.lang.clone()));
        params
    }

    async fn fetch_onecall(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let mut params = self.weather_params(location);
        params.push(("exclude", "minutely".to_string()));

        let body = self
            .get_body("onecall", ONECALL_PATH, &params, ONECALL_TIMEOUT)
            .await?;

        parse_onecall(&body, location, Utc::now())
    }

    async fn fetch_fallback(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let params = self.weather_params(location);

        let current = self
            .get_body("weather", CURRENT_PATH, &params, CURRENT_TIMEOUT)
            .await?;
        let forecast = self
            .get_body("forecast", FORECAST_PATH, &params, FORECAST_TIMEOUT)
            .await?;

        synthesize_report(&current, &forecast, location, Utc::now())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("q", query.to_string()),
            ("limit", GEOCODING_LIMIT.to_string()),
        ];
        let body = self
            .get_body("geocoding", GEOCODING_PATH, &params, GEOCODING_TIMEOUT)
            .await?;

        parse_geocode(&body)
    }

    async fn forecast(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let report = match self.fetch_onecall(location).await {
            Ok(report) => report,
            Err(err) if err.is_network() => {
                tracing::warn!(
                    "One-call request failed ({err}); falling back to current + forecast endpoints"
                );
                self.fetch_fallback(location).await?
            }
            Err(err) => return Err(err),
        };

        tracing::info!(
            location = %location.label(),
            source = ?report.source,
            hours = report.hourly.len(),
            days = report.daily.len(),
            "Weather report fetched"
        );
        Ok(report)
    }

    async fn air_quality(&self, location: &Location) -> Result<AirQualityReading, WeatherError> {
        let params = self.coordinate_params(location);
        let body = self
            .get_body("air_pollution", AIR_POLLUTION_PATH, &params, AIR_TIMEOUT)
            .await?;

        parse_air_quality(&body)
    }
}

// ---- Response shapes ----

#[derive(Debug, Deserialize)]
struct OwCondition {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

impl From<OwCondition> for Condition {
    fn from(c: OwCondition) -> Self {
        Condition {
            id: c.id,
            main: c.main,
            description: c.description,
            icon: c.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocodeEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    #[serde(default)]
    timezone_offset: i32,
    current: OcCurrent,
    #[serde(default)]
    hourly: Vec<OcHourly>,
    #[serde(default)]
    daily: Vec<OcDaily>,
}

#[derive(Debug, Deserialize)]
struct OcCurrent {
    dt: i64,
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    wind_speed: Option<f64>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OcHourly {
    dt: i64,
    temp: f64,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct OcDailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct OcDaily {
    dt: i64,
    temp: OcDailyTemp,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    wind: Option<OwWind>,
    #[serde(default)]
    weather: Vec<OwCondition>,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    wind: Option<OwWind>,
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    dt: Option<i64>,
    main: OwAirMain,
    #[serde(default)]
    components: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

// ---- Parsing ----

fn decode<'a, T: Deserialize<'a>>(endpoint: &'static str, body: &'a str) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| WeatherError::data(endpoint, e.to_string()))
}

fn timestamp(endpoint: &'static str, ts: i64) -> Result<DateTime<Utc>, WeatherError> {
    from_unix(ts).ok_or_else(|| WeatherError::data(endpoint, format!("invalid timestamp {ts}")))
}

fn first_condition(weather: Vec<OwCondition>) -> Option<Condition> {
    weather.into_iter().next().map(Condition::from)
}

pub fn parse_geocode(body: &str) -> Result<Vec<Location>, WeatherError> {
    let entries: Vec<OwGeocodeEntry> = decode("geocoding", body)?;

    Ok(entries
        .into_iter()
        .map(|e| Location {
            name: e.name,
            country: e.country,
            state: e.state,
            lat: e.lat,
            lon: e.lon,
        })
        .collect())
}

/// Map a one-call body onto a report for `location`.
pub fn parse_onecall(
    body: &str,
    location: &Location,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherReport, WeatherError> {
    const ENDPOINT: &str = "onecall";
    let parsed: OcResponse = decode(ENDPOINT, body)?;
    let offset = parsed.timezone_offset;

    let current = parsed.current;
    let snapshot = WeatherSnapshot {
        location: location.clone(),
        timestamp: timestamp(ENDPOINT, current.dt)?,
        temperature: current.temp,
        feels_like: current.feels_like,
        humidity: current.humidity,
        wind_speed: current.wind_speed,
        condition: first_condition(current.weather),
        sunrise: current.sunrise.and_then(from_unix),
        sunset: current.sunset.and_then(from_unix),
    };

    let hourly = parsed
        .hourly
        .into_iter()
        .take(HOURLY_WINDOW)
        .map(|h| {
            Ok(HourlyPoint {
                timestamp: timestamp(ENDPOINT, h.dt)?,
                temperature: h.temp,
                pop: h.pop,
                wind_speed: h.wind_speed,
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    let daily = parsed
        .daily
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|d| {
            let ts = timestamp(ENDPOINT, d.dt)?;
            Ok(ForecastDay {
                date: to_local(ts, offset).date(),
                timestamp: ts,
                high: d.temp.max,
                low: d.temp.min,
                pop: d.pop,
                condition: first_condition(d.weather),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(WeatherReport {
        snapshot,
        daily,
        hourly,
        utc_offset_secs: offset,
        fetched_at,
        source: ReportSource::OneCall,
    })
}

/// One hourly sample before daily aggregation.
#[derive(Debug, Clone)]
pub struct HourlySample {
    pub point: HourlyPoint,
    pub condition: Option<Condition>,
}

/// Build a report from the current-weather and 5-day forecast bodies.
///
/// The current observation becomes the first hourly point (pop 0), followed
/// by forecast entries up to the 48-point window. Days are aggregated from
/// those points.
pub fn synthesize_report(
    current_body: &str,
    forecast_body: &str,
    location: &Location,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherReport, WeatherError> {
    let current: OwCurrentResponse = decode("weather", current_body)?;
    let forecast: OwForecastResponse = decode("forecast", forecast_body)?;
    let offset = current.timezone;

    let observed_at = timestamp("weather", current.dt)?;
    let current_wind = current.wind.as_ref().map(|w| w.speed);
    let current_condition = first_condition(current.weather);
    let sys = current.sys.unwrap_or(OwSys {
        sunrise: None,
        sunset: None,
    });

    let mut samples = Vec::with_capacity(HOURLY_WINDOW);
    samples.push(HourlySample {
        point: HourlyPoint {
            timestamp: observed_at,
            temperature: current.main.temp,
            pop: 0.0,
            wind_speed: current_wind.unwrap_or_default(),
        },
        condition: current_condition.clone(),
    });

    for entry in forecast.list {
        if samples.len() >= HOURLY_WINDOW {
            break;
        }
        samples.push(HourlySample {
            point: HourlyPoint {
                timestamp: timestamp("forecast", entry.dt)?,
                temperature: entry.main.temp,
                pop: entry.pop,
                wind_speed: entry.wind.map(|w| w.speed).unwrap_or_default(),
            },
            condition: first_condition(entry.weather),
        });
    }

    let daily = aggregate_daily(&samples, offset);

    let snapshot = WeatherSnapshot {
        location: location.clone(),
        timestamp: observed_at,
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        humidity: current.main.humidity,
        wind_speed: current_wind,
        condition: current_condition,
        sunrise: sys.sunrise.and_then(from_unix),
        sunset: sys.sunset.and_then(from_unix),
    };

    Ok(WeatherReport {
        snapshot,
        daily,
        hourly: samples.into_iter().map(|s| s.point).collect(),
        utc_offset_secs: offset,
        fetched_at,
        source: ReportSource::Fallback,
    })
}

/// Group samples by local calendar date: min/max temperature, highest pop
/// and the first condition of the day. At most `FORECAST_DAYS` days.
pub fn aggregate_daily(samples: &[HourlySample], offset_secs: i32) -> Vec<ForecastDay> {
    let mut days: BTreeMap<NaiveDate, ForecastDay> = BTreeMap::new();

    for sample in samples {
        let point = &sample.point;
        let date = to_local(point.timestamp, offset_secs).date();

        let day = days.entry(date).or_insert_with(|| ForecastDay {
            date,
            timestamp: local_midnight(date, offset_secs),
            high: point.temperature,
            low: point.temperature,
            pop: point.pop,
            condition: None,
        });

        day.high = day.high.max(point.temperature);
        day.low = day.low.min(point.temperature);
        day.pop = day.pop.max(point.pop);
        if day.condition.is_none() {
            day.condition = sample.condition.clone();
        }
    }

    days.into_values().take(FORECAST_DAYS).collect()
}

fn local_midnight(date: NaiveDate, offset_secs: i32) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    midnight - Duration::seconds(i64::from(offset_secs))
}

pub fn parse_air_quality(body: &str) -> Result<AirQualityReading, WeatherError> {
    const ENDPOINT: &str = "air_pollution";
    let parsed: OwAirResponse = decode(ENDPOINT, body)?;

    let entry = parsed
        .list
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::data(ENDPOINT, "response contained no readings"))?;

    Ok(AirQualityReading {
        timestamp: entry.dt.and_then(from_unix),
        aqi: entry.main.aqi,
        components: entry.components,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
