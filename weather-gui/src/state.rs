//! Application state and the single update function every input goes through.
//!
//! UI events and worker completions arrive as [`Message`]s. [`AppState::update`]
//! mutates state and returns the [`Effect`]s the shell must run; the next frame
//! re-renders from the new state.

use weather_core::{
    AirQualityReading, DisplayPreferences, ErrorKind, Location, SearchHistory, Theme, UnitSystem,
    WeatherError, WeatherReport,
};

/// Identifies one fetch cycle. Results tagged with an older id are dropped.
pub type FetchId = u64;

/// Error shown inline in a panel. Cloneable, unlike `WeatherError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PanelError {
    pub fn title(&self) -> &'static str {
        match self.kind {
            ErrorKind::Configuration => "Configuration error",
            ErrorKind::Network => "Network error",
            ErrorKind::Data => "Unexpected data",
        }
    }
}

impl From<&WeatherError> for PanelError {
    fn from(err: &WeatherError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<WeatherError> for PanelError {
    fn from(err: WeatherError) -> Self {
        Self::from(&err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Empty,
    Loading,
    Ready(T),
    Failed(PanelError),
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        PanelState::Empty
    }
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }
}

/// A modal message (startup problems, empty searches).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    Search,
    /// A previously chosen location; fetched by its stored coordinates.
    HistorySelected(Location),
    UnitsChanged(UnitSystem),
    ToggleTheme,
    Refresh,
    DismissNotice,
    LocationResolved {
        query: String,
        result: Result<Option<Location>, PanelError>,
    },
    ForecastLoaded {
        fetch: FetchId,
        result: Result<WeatherReport, PanelError>,
    },
    AirQualityLoaded {
        fetch: FetchId,
        result: Result<AirQualityReading, PanelError>,
    },
}

/// Side effects requested by [`AppState::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Resolve(String),
    FetchForecast { fetch: FetchId, location: Location },
    FetchAirQuality { fetch: FetchId, location: Location },
    ApplyTheme(Theme),
    SaveHistory,
}

#[derive(Debug)]
pub struct AppState {
    pub prefs: DisplayPreferences,
    pub query: String,
    pub location: Option<Location>,
    pub report: PanelState<WeatherReport>,
    pub air: PanelState<AirQualityReading>,
    pub history: SearchHistory,
    pub notice: Option<Notice>,
    /// Feedback for the last search, shown under the search box.
    pub search_hint: Option<String>,
    /// False when no API key is configured.
    pub can_fetch: bool,
    pending_query: Option<String>,
    fetch: FetchId,
}

impl AppState {
    pub fn new(prefs: DisplayPreferences, history: SearchHistory, can_fetch: bool) -> Self {
        Self {
            prefs,
            query: String::new(),
            location: None,
            report: PanelState::Empty,
            air: PanelState::Empty,
            history,
            notice: None,
            search_hint: None,
            can_fetch,
            pending_query: None,
            fetch: 0,
        }
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Effects to run once the window exists.
    pub fn startup(&mut self, initial_query: Option<String>) -> Vec<Effect> {
        let mut effects = vec![Effect::ApplyTheme(self.prefs.theme)];
        if let Some(query) = initial_query.filter(|q| !q.trim().is_empty()) {
            self.query = query;
            if self.can_fetch {
                effects.extend(self.search());
            }
        }
        effects
    }

    pub fn is_resolving(&self) -> bool {
        self.pending_query.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.is_resolving() || self.report.is_loading() || self.air.is_loading()
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                Vec::new()
            }

            Message::Search => self.search(),

            Message::HistorySelected(location) => {
                if !self.can_fetch {
                    self.notice_missing_key();
                    return Vec::new();
                }
                self.search_hint = None;
                self.pending_query = None;
                self.choose_location(location)
            }

            Message::UnitsChanged(units) => {
                self.prefs.units = units;
                Vec::new()
            }

            Message::ToggleTheme => {
                self.prefs.toggle_theme();
                vec![Effect::ApplyTheme(self.prefs.theme)]
            }

            Message::Refresh => match self.location.clone() {
                Some(location) if self.can_fetch => self.start_fetch(location),
                _ => Vec::new(),
            },

            Message::DismissNotice => {
                self.notice = None;
                Vec::new()
            }

            Message::LocationResolved { query, result } => {
                if self.pending_query.as_deref() != Some(query.as_str()) {
                    tracing::debug!("Dropping stale location result for '{query}'");
                    return Vec::new();
                }
                self.pending_query = None;

                match result {
                    Ok(Some(location)) => self.choose_location(location),
                    Ok(None) => {
                        self.search_hint = Some(format!("No locations found for '{query}'."));
                        Vec::new()
                    }
                    Err(err) => {
                        tracing::warn!("Location lookup for '{query}' failed: {}", err.message);
                        self.search_hint = Some(format!("{}: {}", err.title(), err.message));
                        Vec::new()
                    }
                }
            }

            Message::ForecastLoaded { fetch, result } => {
                if fetch != self.fetch {
                    tracing::debug!("Dropping forecast from fetch {fetch}, current is {}", self.fetch);
                    return Vec::new();
                }
                self.report = match result {
                    Ok(report) => PanelState::Ready(report),
                    Err(err) => PanelState::Failed(err),
                };
                Vec::new()
            }

            Message::AirQualityLoaded { fetch, result } => {
                if fetch != self.fetch {
                    tracing::debug!("Dropping air quality from fetch {fetch}, current is {}", self.fetch);
                    return Vec::new();
                }
                self.air = match result {
                    Ok(reading) => PanelState::Ready(reading),
                    Err(err) => PanelState::Failed(err),
                };
                Vec::new()
            }
        }
    }

    fn search(&mut self) -> Vec<Effect> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            self.search_hint = Some("Please enter a city name.".to_string());
            return Vec::new();
        }
        if !self.can_fetch {
            self.notice_missing_key();
            return Vec::new();
        }

        self.search_hint = None;
        self.pending_query = Some(query.clone());
        vec![Effect::Resolve(query)]
    }

    fn notice_missing_key(&mut self) {
        self.set_notice(Notice::new(
            "API key missing",
            "No OpenWeather API key found. Please set OPENWEATHER_API_KEY in your environment or .env file.",
        ));
    }

    fn choose_location(&mut self, location: Location) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.history.push(&location) {
            effects.push(Effect::SaveHistory);
        }
        self.query = location.label();
        effects.extend(self.start_fetch(location));
        effects
    }

    fn start_fetch(&mut self, location: Location) -> Vec<Effect> {
        self.fetch += 1;
        self.location = Some(location.clone());
        self.report = PanelState::Loading;
        self.air = PanelState::Loading;

        vec![
            Effect::FetchForecast {
                fetch: self.fetch,
                location: location.clone(),
            },
            Effect::FetchAirQuality {
                fetch: self.fetch,
                location,
            },
        ]
    }
}
