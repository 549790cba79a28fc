//! View models: report data formatted for the current unit system.
//!
//! Nothing here touches egui, so every displayed string is testable.

use weather_core::model::pollutant_name;
use weather_core::units::{self, format_pop, format_temperature, format_wind_speed};
use weather_core::{
    AirQualityReading, AqiLevel, ConditionKind, ReportSource, UnitSystem, WeatherReport,
};

/// Roughly this many labelled ticks on the hourly charts.
pub const CHART_TICKS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub location: String,
    pub temperature: String,
    pub summary: String,
    pub kind: Option<ConditionKind>,
    pub details: Vec<String>,
    pub sun: Option<String>,
    pub observed: String,
}

impl CurrentView {
    pub fn build(report: &WeatherReport, units: UnitSystem) -> Self {
        let snapshot = &report.snapshot;

        let mut details = Vec::new();
        if let Some(feels) = snapshot.feels_like {
            details.push(format!("Feels like {}", format_temperature(feels, units)));
        }
        if let Some(humidity) = snapshot.humidity {
            details.push(format!("Humidity {humidity}%"));
        }
        if let Some(wind) = snapshot.wind_speed {
            details.push(format!("Wind {}", format_wind_speed(wind, units)));
        }

        let sun = match (snapshot.sunrise, snapshot.sunset) {
            (Some(rise), Some(set)) => {
                let mut line = format!(
                    "Sunrise {}  Sunset {}",
                    report.local_time(rise).format("%H:%M"),
                    report.local_time(set).format("%H:%M"),
                );
                if let Some(length) = snapshot.day_length() {
                    let hours = length.num_seconds() as f64 / 3600.0;
                    line.push_str(&format!("  Day length {hours:.1} h"));
                }
                Some(line)
            }
            _ => None,
        };

        Self {
            location: report.location().label(),
            temperature: format_temperature(snapshot.temperature, units),
            summary: snapshot
                .condition
                .as_ref()
                .map(|c| c.summary())
                .unwrap_or_default(),
            kind: snapshot.condition.as_ref().map(|c| c.kind()),
            details,
            sun,
            observed: format!(
                "Updated {}",
                report.local_time(snapshot.timestamp).format("%a %d %b %H:%M")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirView {
    pub headline: String,
    pub level: Option<AqiLevel>,
    pub level_label: String,
    /// Bar position, 0..=100.
    pub percent: u8,
    pub pollutants: Vec<String>,
}

impl AirView {
    pub fn build(reading: &AirQualityReading) -> Self {
        let level = reading.level();

        Self {
            headline: match reading.aqi {
                Some(aqi) => format!("AQI: {aqi}"),
                None => "AQI: -".to_string(),
            },
            level,
            level_label: level.map(|l| l.label()).unwrap_or("-").to_string(),
            percent: level.map(|l| l.percent()).unwrap_or(0),
            pollutants: reading
                .components
                .iter()
                .map(|(key, value)| format!("{}: {value:.2}", pollutant_name(key)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub day: String,
    pub temperatures: String,
    pub pop: String,
    pub summary: String,
    pub kind: Option<ConditionKind>,
}

impl ForecastRow {
    pub fn build_all(report: &WeatherReport, units: UnitSystem) -> Vec<Self> {
        report
            .daily
            .iter()
            .map(|day| Self {
                day: day.date.format("%a %d %b").to_string(),
                temperatures: format!(
                    "{}/{} {}",
                    whole_degrees(day.high, units),
                    whole_degrees(day.low, units),
                    units.temperature_symbol()
                ),
                pop: format!("POP: {}", format_pop(day.pop)),
                summary: day.condition.as_ref().map(|c| c.summary()).unwrap_or_default(),
                kind: day.condition.as_ref().map(|c| c.kind()),
            })
            .collect()
    }
}

fn whole_degrees(celsius: f64, units: UnitSystem) -> String {
    let formatted = format_temperature(celsius, units);
    formatted
        .trim_end_matches(units.temperature_symbol())
        .to_string()
}

/// The three hourly series, indexed by position in the report's window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Card title; the fallback source spaces points three hours apart.
    pub title: &'static str,
    pub temperature: Vec<[f64; 2]>,
    /// Percent, 0..=100.
    pub pop: Vec<[f64; 2]>,
    pub wind: Vec<[f64; 2]>,
    /// Local `HH:MM` for each hour.
    pub labels: Vec<String>,
    pub tick_step: usize,
    pub temperature_unit: &'static str,
    pub wind_unit: &'static str,
}

impl ChartSeries {
    pub fn build(report: &WeatherReport, units: UnitSystem) -> Self {
        let mut series = Self {
            title: match report.source {
                ReportSource::OneCall => "Next 48 hours",
                ReportSource::Fallback => "Next 5 days (3-hour steps)",
            },
            temperature: Vec::with_capacity(report.hourly.len()),
            pop: Vec::with_capacity(report.hourly.len()),
            wind: Vec::with_capacity(report.hourly.len()),
            labels: Vec::with_capacity(report.hourly.len()),
            tick_step: (report.hourly.len() / CHART_TICKS).max(1),
            temperature_unit: units.temperature_symbol(),
            wind_unit: units.speed_symbol(),
        };

        for (i, point) in report.hourly.iter().enumerate() {
            let x = i as f64;
            series
                .temperature
                .push([x, units::temperature(point.temperature, units)]);
            series.pop.push([x, point.pop * 100.0]);
            series.wind.push([x, units::wind_speed(point.wind_speed, units)]);
            series.labels.push(
                report
                    .local_time(point.timestamp)
                    .format("%H:%M")
                    .to_string(),
            );
        }

        series
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// X positions that carry a label.
    pub fn tick_positions(&self) -> Vec<f64> {
        (0..self.labels.len())
            .step_by(self.tick_step)
            .map(|i| i as f64)
            .collect()
    }

    /// Axis label for grid position `x`; blank between ticks.
    pub fn label_at(&self, x: f64) -> String {
        let index = x.round();
        if (x - index).abs() > 1e-6 || index < 0.0 {
            return String::new();
        }
        let index = index as usize;
        if index % self.tick_step != 0 {
            return String::new();
        }
        self.labels.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::BTreeMap;
    use weather_core::{
        Condition, ForecastDay, HourlyPoint, Location, ReportSource, WeatherSnapshot,
    };

    fn clear() -> Condition {
        Condition {
            id: 800,
            main: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
        }
    }

    fn report() -> WeatherReport {
        let noon = Utc.with_ymd_and_hms(2023, 10, 16, 12, 0, 0).unwrap();
        WeatherReport {
            snapshot: WeatherSnapshot {
                location: Location {
                    name: "Paris".into(),
                    country: "FR".into(),
                    state: None,
                    lat: 48.85,
                    lon: 2.35,
                },
                timestamp: noon,
                temperature: 20.0,
                feels_like: Some(18.6),
                humidity: Some(40),
                wind_speed: Some(5.0),
                condition: Some(clear()),
                sunrise: Some(Utc.with_ymd_and_hms(2023, 10, 16, 6, 6, 0).unwrap()),
                sunset: Some(Utc.with_ymd_and_hms(2023, 10, 16, 16, 48, 0).unwrap()),
            },
            daily: vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2023, 10, 16).unwrap(),
                timestamp: noon,
                high: 21.4,
                low: 11.6,
                pop: 0.4,
                condition: Some(clear()),
            }],
            hourly: (0..48)
                .map(|h| HourlyPoint {
                    timestamp: noon + chrono::Duration::hours(h),
                    temperature: 20.0,
                    pop: 0.25,
                    wind_speed: 10.0,
                })
                .collect(),
            utc_offset_secs: 7200,
            fetched_at: noon,
            source: ReportSource::OneCall,
        }
    }

    #[test]
    fn current_temperature_in_both_unit_systems() {
        let report = report();
        assert_eq!(CurrentView::build(&report, UnitSystem::Metric).temperature, "20°C");
        assert_eq!(CurrentView::build(&report, UnitSystem::Imperial).temperature, "68°F");
    }

    #[test]
    fn current_view_details() {
        let view = CurrentView::build(&report(), UnitSystem::Metric);

        assert_eq!(view.location, "Paris, FR");
        assert_eq!(view.summary, "Clear sky");
        assert_eq!(view.kind, Some(ConditionKind::Clear));
        assert_eq!(
            view.details,
            vec!["Feels like 19°C", "Humidity 40%", "Wind 5.0 m/s"]
        );
        assert_eq!(
            view.sun.as_deref(),
            Some("Sunrise 08:06  Sunset 18:48  Day length 10.7 h")
        );
        assert_eq!(view.observed, "Updated Mon 16 Oct 14:00");
    }

    #[test]
    fn current_view_without_optional_fields() {
        let mut report = report();
        report.snapshot.feels_like = None;
        report.snapshot.humidity = None;
        report.snapshot.wind_speed = None;
        report.snapshot.condition = None;
        report.snapshot.sunset = None;

        let view = CurrentView::build(&report, UnitSystem::Metric);
        assert!(view.details.is_empty());
        assert!(view.sun.is_none());
        assert_eq!(view.summary, "");
        assert_eq!(view.kind, None);
    }

    #[test]
    fn imperial_wind() {
        let view = CurrentView::build(&report(), UnitSystem::Imperial);
        assert_eq!(view.details[2], "Wind 11.2 mph");
    }

    #[test]
    fn forecast_rows() {
        let rows = ForecastRow::build_all(&report(), UnitSystem::Metric);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day, "Mon 16 Oct");
        assert_eq!(rows[0].temperatures, "21/12 °C");
        assert_eq!(rows[0].pop, "POP: 40%");
        assert_eq!(rows[0].summary, "Clear sky");

        let imperial = ForecastRow::build_all(&report(), UnitSystem::Imperial);
        assert_eq!(imperial[0].temperatures, "71/53 °F");
    }

    #[test]
    fn air_view_from_reading() {
        let mut components = BTreeMap::new();
        components.insert("o3".to_string(), 68.664);
        components.insert("co".to_string(), 201.94);
        let reading = AirQualityReading {
            timestamp: None,
            aqi: Some(2),
            components,
        };

        let view = AirView::build(&reading);
        assert_eq!(view.headline, "AQI: 2");
        assert_eq!(view.level, Some(AqiLevel::Fair));
        assert_eq!(view.level_label, "Fair");
        assert_eq!(view.percent, 25);
        assert_eq!(
            view.pollutants,
            vec!["Carbon monoxide (CO): 201.94", "Ozone (O₃): 68.66"]
        );
    }

    #[test]
    fn air_view_with_out_of_range_index() {
        let reading = AirQualityReading {
            timestamp: None,
            aqi: Some(9),
            components: BTreeMap::new(),
        };

        let view = AirView::build(&reading);
        assert_eq!(view.headline, "AQI: 9");
        assert_eq!(view.level, None);
        assert_eq!(view.level_label, "-");
        assert_eq!(view.percent, 0);
    }

    #[test]
    fn chart_series_converts_units() {
        let series = ChartSeries::build(&report(), UnitSystem::Imperial);

        assert_eq!(series.temperature.len(), 48);
        assert!((series.temperature[0][1] - 68.0).abs() < 1e-9);
        assert!((series.pop[3][1] - 25.0).abs() < 1e-9);
        assert!((series.wind[0][1] - 22.369_362_920_544_02).abs() < 1e-9);
        assert_eq!(series.temperature_unit, "°F");
        assert_eq!(series.wind_unit, "mph");
    }

    #[test]
    fn chart_ticks_use_local_time() {
        let series = ChartSeries::build(&report(), UnitSystem::Metric);

        assert_eq!(series.tick_step, 6);
        assert_eq!(series.label_at(0.0), "14:00");
        assert_eq!(series.label_at(6.0), "20:00");
        assert_eq!(series.label_at(3.0), "");
        assert_eq!(series.label_at(2.5), "");
        assert_eq!(series.label_at(-6.0), "");
        assert_eq!(series.label_at(96.0), "");
        assert_eq!(
            series.tick_positions(),
            vec![0.0, 6.0, 12.0, 18.0, 24.0, 30.0, 36.0, 42.0]
        );
    }

    #[test]
    fn chart_title_follows_report_source() {
        let mut report = report();
        assert_eq!(ChartSeries::build(&report, UnitSystem::Metric).title, "Next 48 hours");

        report.source = ReportSource::Fallback;
        assert_eq!(
            ChartSeries::build(&report, UnitSystem::Metric).title,
            "Next 5 days (3-hour steps)"
        );
    }

    #[test]
    fn short_series_labels_every_point() {
        let mut report = report();
        report.hourly.truncate(3);

        let series = ChartSeries::build(&report, UnitSystem::Metric);
        assert_eq!(series.tick_step, 1);
        assert_eq!(series.label_at(2.0), "16:00");
    }

    #[test]
    fn empty_series() {
        let mut report = report();
        report.hourly.clear();

        let series = ChartSeries::build(&report, UnitSystem::Metric);
        assert!(series.is_empty());
        assert_eq!(series.label_at(0.0), "");
    }
}
