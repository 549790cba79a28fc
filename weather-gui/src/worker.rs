//! Background fetches.
//!
//! Requests run on a small tokio runtime owned by the worker. Each task sends
//! its outcome back as a [`Message`] over an mpsc channel that the UI drains
//! once per frame, so the provider is never awaited on the UI thread.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use weather_core::{Location, WeatherProvider};

use crate::state::{FetchId, Message, PanelError};

pub struct FetchWorker {
    runtime: tokio::runtime::Runtime,
    provider: Arc<dyn WeatherProvider>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    repaint: Option<egui::Context>,
}

impl FetchWorker {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("mysky-fetch")
            .enable_all()
            .build()?;
        let (tx, rx) = channel();

        Ok(Self {
            runtime,
            provider,
            tx,
            rx,
            repaint: None,
        })
    }

    /// Wake the UI when a result arrives.
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn spawn_resolve(&self, query: String) {
        let provider = Arc::clone(&self.provider);
        let notify = self.notifier();

        self.runtime.spawn(async move {
            tracing::info!("Resolving '{query}'");
            let result = provider.resolve(&query).await.map_err(PanelError::from);
            notify.send(Message::LocationResolved { query, result });
        });
    }

    pub fn spawn_forecast(&self, fetch: FetchId, location: Location) {
        let provider = Arc::clone(&self.provider);
        let notify = self.notifier();

        self.runtime.spawn(async move {
            let result = provider.forecast(&location).await;
            if let Err(err) = &result {
                tracing::warn!("Forecast for {} failed: {err}", location.label());
            }
            notify.send(Message::ForecastLoaded {
                fetch,
                result: result.map_err(PanelError::from),
            });
        });
    }

    pub fn spawn_air_quality(&self, fetch: FetchId, location: Location) {
        let provider = Arc::clone(&self.provider);
        let notify = self.notifier();

        self.runtime.spawn(async move {
            let result = provider.air_quality(&location).await;
            if let Err(err) = &result {
                tracing::warn!("Air quality for {} failed: {err}", location.label());
            }
            notify.send(Message::AirQualityLoaded {
                fetch,
                result: result.map_err(PanelError::from),
            });
        });
    }

    /// Everything that finished since the last call.
    pub fn drain(&self) -> Vec<Message> {
        self.rx.try_iter().collect()
    }

    fn notifier(&self) -> Notifier {
        Notifier {
            tx: self.tx.clone(),
            repaint: self.repaint.clone(),
        }
    }
}

struct Notifier {
    tx: Sender<Message>,
    repaint: Option<egui::Context>,
}

impl Notifier {
    fn send(&self, message: Message) {
        // The receiver only goes away when the window has closed.
        if self.tx.send(message).is_err() {
            return;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use weather_core::{AirQualityReading, ErrorKind, WeatherError, WeatherReport};

    #[derive(Debug)]
    struct StubProvider;

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn geocode(&self, query: &str) -> Result<Vec<Location>, WeatherError> {
            if query == "Atlantis" {
                return Ok(Vec::new());
            }
            Ok(vec![Location {
                name: query.to_string(),
                country: "NO".into(),
                state: None,
                lat: 59.91,
                lon: 10.75,
            }])
        }

        async fn forecast(&self, _location: &Location) -> Result<WeatherReport, WeatherError> {
            Err(WeatherError::Data {
                endpoint: "onecall",
                message: "missing field `temp`".into(),
            })
        }

        async fn air_quality(&self, _location: &Location) -> Result<AirQualityReading, WeatherError> {
            Ok(AirQualityReading {
                timestamp: None,
                aqi: Some(2),
                components: Default::default(),
            })
        }
    }

    fn worker() -> FetchWorker {
        FetchWorker::new(Arc::new(StubProvider)).unwrap()
    }

    fn next_message(worker: &FetchWorker) -> Message {
        worker.rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn resolve_reports_location() {
        let worker = worker();
        worker.spawn_resolve("Oslo".into());

        match next_message(&worker) {
            Message::LocationResolved { query, result } => {
                assert_eq!(query, "Oslo");
                assert_eq!(result.unwrap().unwrap().label(), "Oslo, NO");
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn resolve_without_match_reports_none() {
        let worker = worker();
        worker.spawn_resolve("Atlantis".into());

        match next_message(&worker) {
            Message::LocationResolved { result, .. } => assert!(result.unwrap().is_none()),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn fetch_results_carry_their_fetch_id() {
        let worker = worker();
        let location = Location::from_coordinates(59.91, 10.75);
        worker.spawn_forecast(7, location.clone());
        worker.spawn_air_quality(7, location);

        let mut saw_forecast = false;
        let mut saw_air = false;
        for _ in 0..2 {
            match next_message(&worker) {
                Message::ForecastLoaded { fetch, result } => {
                    assert_eq!(fetch, 7);
                    assert_eq!(result.unwrap_err().kind, ErrorKind::Data);
                    saw_forecast = true;
                }
                Message::AirQualityLoaded { fetch, result } => {
                    assert_eq!(fetch, 7);
                    assert_eq!(result.unwrap().aqi, Some(2));
                    saw_air = true;
                }
                other => panic!("unexpected message {other:?}"),
            }
        }
        assert!(saw_forecast && saw_air);
        assert!(worker.drain().is_empty());
    }
}
