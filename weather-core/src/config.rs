use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::WeatherError,
    prefs::{DisplayPreferences, Theme, UnitSystem},
};

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENWEATHER_API_KEY", "API_KEY"];

pub const DEFAULT_LANG: &str = "en";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "imperial"
/// theme = "light"
/// default_location = "Paris, FR"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: UnitSystem,

    #[serde(default)]
    pub theme: Theme,

    /// Language for condition descriptions.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Location searched on startup, if any.
    #[serde(default)]
    pub default_location: Option<String>,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: UnitSystem::default(),
            theme: Theme::default(),
            lang: default_lang(),
            default_location: None,
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or return the defaults
    /// if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Seed the process environment from a `.env` file in the working
    /// directory. A missing file is not an error.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
        }
    }

    /// Resolve the API key from the process environment, then the file.
    pub fn api_key(&self) -> Result<String, WeatherError> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    /// Resolve the API key using `lookup` for environment variables.
    /// Environment wins over the file; blank values count as missing.
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String, WeatherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or_else(|| {
                WeatherError::Config(
                    "No OpenWeather API key found.\n\
                     Hint: set OPENWEATHER_API_KEY in your environment or .env file, \
                     or add `api_key = \"...\"` to the config file."
                        .to_string(),
                )
            })
    }

    pub fn preferences(&self) -> DisplayPreferences {
        DisplayPreferences::new(self.units, self.theme)
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "mysky", "mysky")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_file_key(key: &str) -> Config {
        Config {
            api_key: Some(key.to_string()),
            ..Config::default()
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(env(&[])).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.to_string().contains("No OpenWeather API key found"));
    }

    #[test]
    fn api_key_from_file() {
        let cfg = with_file_key("FILE_KEY");

        assert_eq!(cfg.resolve_api_key(env(&[])).unwrap(), "FILE_KEY");
    }

    #[test]
    fn environment_overrides_file() {
        let cfg = with_file_key("FILE_KEY");

        let key = cfg
            .resolve_api_key(env(&[("API_KEY", "GENERIC"), ("OPENWEATHER_API_KEY", "OWM")]))
            .unwrap();
        assert_eq!(key, "OWM");

        let key = cfg.resolve_api_key(env(&[("API_KEY", "GENERIC")])).unwrap();
        assert_eq!(key, "GENERIC");
    }

    #[test]
    fn blank_keys_are_skipped() {
        let cfg = with_file_key("   ");

        let err = cfg
            .resolve_api_key(env(&[("OPENWEATHER_API_KEY", "")]))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let key = cfg
            .resolve_api_key(env(&[("OPENWEATHER_API_KEY", ""), ("API_KEY", " k ")]))
            .unwrap();
        assert_eq!(key, "k");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.lang, "en");
    }

    #[test]
    fn full_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_key = \"KEY\"\n\
             units = \"imperial\"\n\
             theme = \"light\"\n\
             lang = \"de\"\n\
             default_location = \"Paris, FR\"\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(
            loaded,
            Config {
                api_key: Some("KEY".into()),
                units: UnitSystem::Imperial,
                theme: Theme::Light,
                lang: "de".into(),
                default_location: Some("Paris, FR".into()),
            }
        );
        assert_eq!(
            loaded.preferences(),
            DisplayPreferences::new(UnitSystem::Imperial, Theme::Light)
        );
    }

    #[test]
    fn unit_and_theme_names_ignore_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"GOOD_KEY\"\ntheme = \"Dark\"\nunits = \"Imperial\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("GOOD_KEY"));
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.units, UnitSystem::Imperial);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.units, UnitSystem::Metric);
        assert_eq!(cfg.theme, Theme::Dark);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = \"kelvin\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(format!("{err:#}").contains("Unknown unit system 'kelvin'"));
    }
}
