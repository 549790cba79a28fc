use serde::Deserialize;
use std::fmt;

use crate::error::WeatherError;

/// Unit system used when rendering values. Stored data is always metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    /// Label for the unit selector, e.g. "metric (°C)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.as_str(), self.temperature_symbol())
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(WeatherError::Config(format!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            ))),
        }
    }
}

/// Visual theme of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UnitSystem {
    type Error = WeatherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(WeatherError::Config(format!(
                "Unknown theme '{value}'. Supported: light, dark."
            ))),
        }
    }
}

impl TryFrom<String> for Theme {
    type Error = WeatherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// What the user picked for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayPreferences {
    pub units: UnitSystem,
    pub theme: Theme,
}

impl DisplayPreferences {
    pub fn new(units: UnitSystem, theme: Theme) -> Self {
        Self { units, theme }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_as_str_roundtrip() {
        for units in UnitSystem::all() {
            let parsed = UnitSystem::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unknown_unit_system_is_config_error() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn theme_parse_is_case_insensitive() {
        assert_eq!(Theme::try_from("Light").unwrap(), Theme::Light);
        assert_eq!(Theme::try_from(" DARK ").unwrap(), Theme::Dark);
        assert!(Theme::try_from("solarized").is_err());
    }

    #[test]
    fn defaults_are_metric_and_dark() {
        let prefs = DisplayPreferences::default();
        assert_eq!(prefs.units, UnitSystem::Metric);
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn theme_toggle_flips_back_and_forth() {
        let mut prefs = DisplayPreferences::new(UnitSystem::Imperial, Theme::Dark);

        prefs.toggle_theme();
        assert_eq!(prefs, DisplayPreferences::new(UnitSystem::Imperial, Theme::Light));

        prefs.toggle_theme();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.units, UnitSystem::Imperial);
    }

    #[test]
    fn unit_labels() {
        assert_eq!(UnitSystem::Metric.label(), "metric (°C)");
        assert_eq!(UnitSystem::Imperial.speed_symbol(), "mph");
    }
}
