use std::fmt;

use thiserror::Error;

/// Broad category of a failure, used by the UI to decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid configuration (API key, unit/theme names).
    Configuration,
    /// The request could not complete or the server refused it.
    Network,
    /// The response could not be mapped onto the expected records.
    Data,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Network => "network error",
            ErrorKind::Data => "data error",
        })
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0}")]
    Config(String),

    #[error("{context}: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected OpenWeather {endpoint} response: {message}")]
    Data {
        endpoint: &'static str,
        message: String,
    },
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Config(_) => ErrorKind::Configuration,
            WeatherError::Network { .. } | WeatherError::Status { .. } => ErrorKind::Network,
            WeatherError::Data { .. } => ErrorKind::Data,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub fn is_data(&self) -> bool {
        self.kind() == ErrorKind::Data
    }

    pub(crate) fn data(endpoint: &'static str, message: impl Into<String>) -> Self {
        WeatherError::Data {
            endpoint,
            message: message.into(),
        }
    }
}
