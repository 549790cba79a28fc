use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of days shown in the forecast list.
pub const FORECAST_DAYS: usize = 7;

/// Width of the hourly chart window.
pub const HOURLY_WINDOW: usize = 48;

/// A place the user asked for, resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        Self {
            name: format!("{lat:.4}, {lon:.4}"),
            country: String::new(),
            state: None,
            lat,
            lon,
        }
    }

    /// Parse a `"lat,lon"` query. Returns `None` for anything that is not a
    /// pair of in-range numbers, so the caller falls back to geocoding.
    pub fn parse_coordinates(query: &str) -> Option<Self> {
        let (lat, lon) = query.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some(Self::from_coordinates(lat, lon))
    }

    /// "Paris, FR" or "Springfield, US, Illinois".
    pub fn label(&self) -> String {
        let mut label = self.name.clone();
        if !self.country.is_empty() {
            label.push_str(", ");
            label.push_str(&self.country);
        }
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            label.push_str(", ");
            label.push_str(state);
        }
        label
    }
}

/// Provider condition entry (`weather[0]` in OpenWeather payloads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        let main = if self.main.is_empty() {
            &self.description
        } else {
            &self.main
        };
        ConditionKind::from_main(main)
    }

    /// Description with the first letter upper-cased.
    pub fn summary(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => self.main.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Clear,
    Rain,
    Clouds,
    Snow,
    Thunderstorm,
    Mist,
    Other,
}

impl ConditionKind {
    /// Classify the provider's `main` group ("Clear", "Drizzle", "Haze", ...).
    pub fn from_main(main: &str) -> Self {
        let m = main.to_lowercase();
        if m.contains("clear") {
            Self::Clear
        } else if m.contains("rain") || m.contains("drizzle") {
            Self::Rain
        } else if m.contains("cloud") {
            Self::Clouds
        } else if m.contains("snow") {
            Self::Snow
        } else if m.contains("thunder") {
            Self::Thunderstorm
        } else if m.contains("mist") || m.contains("fog") || m.contains("haze") {
            Self::Mist
        } else {
            Self::Other
        }
    }
}

/// Current conditions at the fetched location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    /// Metres per second.
    pub wind_speed: Option<f64>,
    pub condition: Option<Condition>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn day_length(&self) -> Option<Duration> {
        match (self.sunrise, self.sunset) {
            (Some(rise), Some(set)) if set > rise => Some(set - rise),
            _ => None,
        }
    }
}

/// OpenWeather AQI scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiLevel {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AqiLevel {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// Position on a 0..=100 bar: Good is 0, Very Poor is 100.
    pub fn percent(&self) -> u8 {
        ((f64::from(self.index() - 1) / 4.0) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw index as reported; kept even when outside 1..=5.
    pub aqi: Option<u8>,
    /// Pollutant key (`co`, `pm2_5`, ...) to concentration in µg/m³.
    pub components: BTreeMap<String, f64>,
}

impl AirQualityReading {
    pub fn level(&self) -> Option<AqiLevel> {
        self.aqi.and_then(AqiLevel::from_index)
    }
}

/// Human-readable pollutant name; unknown keys are upper-cased.
pub fn pollutant_name(key: &str) -> String {
    let name = match key.to_lowercase().as_str() {
        "co" => "Carbon monoxide (CO)",
        "no" => "Nitric oxide (NO)",
        "no2" => "Nitrogen dioxide (NO₂)",
        "o3" => "Ozone (O₃)",
        "so2" => "Sulfur dioxide (SO₂)",
        "pm2_5" => "PM2.5 (fine particulates)",
        "pm10" => "PM10 (coarse particulates)",
        "nh3" => "Ammonia (NH₃)",
        _ => return key.to_uppercase(),
    };
    name.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Calendar date at the location.
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub high: f64,
    pub low: f64,
    /// Probability of precipitation, 0..=1.
    pub pop: f64,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub pop: f64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportSource {
    /// Single one-call response.
    OneCall,
    /// Synthesized from the current-weather and 5-day forecast endpoints.
    Fallback,
}

/// Everything one fetch cycle produced for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    pub daily: Vec<ForecastDay>,
    pub hourly: Vec<HourlyPoint>,
    pub utc_offset_secs: i32,
    pub fetched_at: DateTime<Utc>,
    pub source: ReportSource,
}

impl WeatherReport {
    pub fn location(&self) -> &Location {
        &self.snapshot.location
    }

    pub fn local_time(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        to_local(ts, self.utc_offset_secs)
    }
}

pub fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// Wall-clock time at a location `offset_secs` east of UTC.
pub fn to_local(ts: DateTime<Utc>, offset_secs: i32) -> NaiveDateTime {
    match FixedOffset::east_opt(offset_secs) {
        Some(offset) => ts.with_timezone(&offset).naive_local(),
        None => ts.naive_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Location {
        Location {
            name: "Paris".into(),
            country: "FR".into(),
            state: Some("Ile-de-France".into()),
            lat: 48.8566,
            lon: 2.3522,
        }
    }

    #[test]
    fn location_label_includes_state_when_present() {
        assert_eq!(paris().label(), "Paris, FR, Ile-de-France");

        let mut loc = paris();
        loc.state = None;
        assert_eq!(loc.label(), "Paris, FR");
    }

    #[test]
    fn parse_coordinates_accepts_lat_lon_pairs() {
        let loc = Location::parse_coordinates(" 12.97, 77.59 ").expect("valid coordinates");
        assert_eq!(loc.lat, 12.97);
        assert_eq!(loc.lon, 77.59);
        assert_eq!(loc.label(), "12.9700, 77.5900");
    }

    #[test]
    fn parse_coordinates_rejects_names_and_out_of_range() {
        assert!(Location::parse_coordinates("Paris, FR").is_none());
        assert!(Location::parse_coordinates("Bangalore").is_none());
        assert!(Location::parse_coordinates("91.0, 10.0").is_none());
        assert!(Location::parse_coordinates("10.0, 181.0").is_none());
    }

    #[test]
    fn condition_kinds() {
        assert_eq!(ConditionKind::from_main("Clear"), ConditionKind::Clear);
        assert_eq!(ConditionKind::from_main("Drizzle"), ConditionKind::Rain);
        assert_eq!(ConditionKind::from_main("Clouds"), ConditionKind::Clouds);
        assert_eq!(ConditionKind::from_main("Snow"), ConditionKind::Snow);
        assert_eq!(ConditionKind::from_main("Thunderstorm"), ConditionKind::Thunderstorm);
        assert_eq!(ConditionKind::from_main("Haze"), ConditionKind::Mist);
        assert_eq!(ConditionKind::from_main("Tornado"), ConditionKind::Other);
    }

    #[test]
    fn condition_summary_capitalizes_description() {
        let c = Condition {
            id: 803,
            main: "Clouds".into(),
            description: "broken clouds".into(),
            icon: "04d".into(),
        };
        assert_eq!(c.summary(), "Broken clouds");
        assert_eq!(c.kind(), ConditionKind::Clouds);
    }

    #[test]
    fn aqi_levels_map_to_bar_percent() {
        assert_eq!(AqiLevel::Good.percent(), 0);
        assert_eq!(AqiLevel::Fair.percent(), 25);
        assert_eq!(AqiLevel::Moderate.percent(), 50);
        assert_eq!(AqiLevel::VeryPoor.percent(), 100);
        assert_eq!(AqiLevel::from_index(4).map(|l| l.label()), Some("Poor"));
        assert!(AqiLevel::from_index(0).is_none());
        assert!(AqiLevel::from_index(6).is_none());
    }

    #[test]
    fn pollutant_names() {
        assert_eq!(pollutant_name("pm2_5"), "PM2.5 (fine particulates)");
        assert_eq!(pollutant_name("CO"), "Carbon monoxide (CO)");
        assert_eq!(pollutant_name("xyz"), "XYZ");
    }

    #[test]
    fn day_length_requires_both_ends() {
        let rise = from_unix(1_700_000_000).unwrap();
        let set = from_unix(1_700_000_000 + 11 * 3600).unwrap();
        let mut snapshot = WeatherSnapshot {
            location: paris(),
            timestamp: rise,
            temperature: 10.0,
            feels_like: None,
            humidity: None,
            wind_speed: None,
            condition: None,
            sunrise: Some(rise),
            sunset: Some(set),
        };
        assert_eq!(snapshot.day_length(), Some(Duration::hours(11)));

        snapshot.sunset = None;
        assert_eq!(snapshot.day_length(), None);
    }

    #[test]
    fn local_time_applies_offset() {
        // 2023-11-14 22:13:20 UTC
        let ts = from_unix(1_700_000_000).unwrap();
        let local = to_local(ts, 5 * 3600 + 1800);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2023-11-15 03:43");
    }
}
