//! Event coordinator between the input box, the provider and the renderer.

use std::sync::Arc;
use tokio::{
    sync::{Mutex, MutexGuard},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    debounce::{Debouncer, Sequence},
    error::Result,
    model::{
        AirQualityReading, ForecastEntry, LocationCandidate, SearchQuery, SearchState,
        WeatherSnapshot,
    },
    provider::{MIN_QUERY_CHARS, WeatherProvider},
    render::{RenderTarget, Renderer, format},
    validate::validate_location,
};

pub const EMPTY_INPUT_ALERT: &str = "Please enter a city name!";

/// What a successful search put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub snapshot: WeatherSnapshot,
    pub forecast: Vec<ForecastEntry>,
    pub air_quality: Option<AirQualityReading>,
}

#[derive(Debug)]
struct Inner<T> {
    provider: Arc<dyn WeatherProvider>,
    view: Mutex<Renderer<T>>,
    input: Mutex<String>,
    state: Mutex<SearchState>,
    lookups: Sequence,
}

impl<T: RenderTarget> Inner<T> {
    async fn refresh_suggestions(&self) {
        let query = self.input.lock().await.trim().to_string();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.lookups.invalidate();
            self.view.lock().await.hide_suggestions();
            return;
        }

        let ticket = self.lookups.next();
        let result = self.provider.lookup_locations(&query).await;

        let mut view = self.view.lock().await;
        if !self.lookups.is_current(ticket) {
            debug!(%query, "discarding stale suggestions");
            return;
        }

        match result {
            Ok(candidates) => view.show_suggestions(candidates),
            Err(err) => {
                warn!(error = %err, %query, "autocomplete lookup failed");
                view.hide_suggestions();
            }
        }
    }
}

/// Drives the search + autocomplete state machine.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug)]
pub struct Controller<T> {
    inner: Arc<Inner<T>>,
    debouncer: Debouncer,
}

impl<T> Clone for Controller<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<T: RenderTarget + 'static> Controller<T> {
    pub fn new(provider: Arc<dyn WeatherProvider>, target: T, config: &Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                view: Mutex::new(Renderer::new(target, config)),
                input: Mutex::new(String::new()),
                state: Mutex::new(SearchState::Idle),
                lookups: Sequence::new(),
            }),
            debouncer: Debouncer::new(config.debounce()),
        }
    }

    /// Start-up work: load the default background.
    pub async fn init(&self) {
        self.inner.view.lock().await.set_default_background();
    }

    pub async fn state(&self) -> SearchState {
        *self.inner.state.lock().await
    }

    pub async fn input(&self) -> String {
        self.inner.input.lock().await.clone()
    }

    /// Replace the input text without triggering autocomplete.
    pub async fn set_input(&self, text: impl Into<String>) {
        *self.inner.input.lock().await = text.into();
    }

    pub async fn view(&self) -> MutexGuard<'_, Renderer<T>> {
        self.inner.view.lock().await
    }

    /// Input changed: schedule a debounced lookup for the new text.
    pub async fn on_input(&self, text: impl Into<String>) -> JoinHandle<()> {
        self.set_input(text).await;
        let inner = Arc::clone(&self.inner);
        self.debouncer
            .schedule(async move { inner.refresh_suggestions().await })
    }

    /// Focusing a non-empty input reopens suggestions.
    pub async fn on_focus(&self) -> Option<JoinHandle<()>> {
        let text = self.input().await;
        if text.trim().is_empty() {
            return None;
        }
        Some(self.on_input(text).await)
    }

    pub async fn on_outside_click(&self) {
        self.debouncer.cancel();
        self.inner.lookups.invalidate();
        self.inner.view.lock().await.hide_suggestions();
    }

    /// Lookup for the current input, skipping the debounce window.
    pub async fn suggest_now(&self) {
        self.inner.refresh_suggestions().await;
    }

    pub async fn select_suggestion(
        &self,
        candidate: &LocationCandidate,
    ) -> Result<Option<SearchReport>> {
        let value = candidate.input_value();
        self.set_input(value.clone()).await;
        {
            let mut view = self.inner.view.lock().await;
            view.set_input_value(value);
            view.hide_suggestions();
        }
        self.search().await
    }

    /// Run a full search for the current input.
    ///
    /// Returns `Ok(None)` when nothing was started: blank input, or a search
    /// already in flight.
    pub async fn search(&self) -> Result<Option<SearchReport>> {
        let input = self.input().await;
        let Some(query) = SearchQuery::parse(&input) else {
            self.inner.view.lock().await.show_alert(EMPTY_INPUT_ALERT);
            return Ok(None);
        };

        {
            let mut state = self.inner.state.lock().await;
            if *state == SearchState::Loading {
                debug!("search already in flight");
                return Ok(None);
            }
            *state = SearchState::Loading;
        }

        self.debouncer.cancel();
        self.inner.lookups.invalidate();
        {
            let mut view = self.inner.view.lock().await;
            view.set_loading(true);
            view.hide_suggestions();
        }

        let result = self.run_search(&query).await;

        let mut view = self.inner.view.lock().await;
        let next = match &result {
            Ok(report) => {
                info!(city = %report.snapshot.city_name, "search finished");
                SearchState::Displayed
            }
            Err(err) => {
                warn!(error = %err, location = %query.location(), "search failed");
                view.show_alert(err.to_string());
                view.clear_weather_data();
                SearchState::Failed
            }
        };
        *self.inner.state.lock().await = next;
        view.set_loading(false);

        result.map(Some)
    }

    async fn run_search(&self, query: &SearchQuery) -> Result<SearchReport> {
        let provider = &self.inner.provider;
        let location = query.location();

        let current = provider.fetch_current_weather(&location).await?;
        validate_location(&current, &query.city, query.country.as_deref())?;
        let snapshot = self.inner.view.lock().await.display_weather(&current);

        let forecast = provider.fetch_forecast(&location).await?;
        let forecast = self.inner.view.lock().await.display_forecast(&forecast);

        let air_quality = match &current.coord {
            Some(coord) => provider.fetch_air_quality(coord.lat, coord.lon).await,
            None => None,
        };
        self.inner
            .view
            .lock()
            .await
            .display_air_quality(air_quality.as_ref());

        Ok(SearchReport {
            snapshot,
            forecast,
            air_quality: air_quality
                .and_then(|r| r.current_index())
                .map(format::air_quality_reading),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::WeatherError,
        model::{
            AirQualityMain, AirQualityReport, AirQualitySample, Condition, Coordinates,
            CurrentConditions, ForecastCity, ForecastItem, ForecastMain, ForecastReport,
            MainReadings, SunInfo, Wind,
        },
        render::{Field, PLACEHOLDER, ViewUpdate, tests::Recorder},
    };
    use async_trait::async_trait;
    use std::{collections::HashMap, sync::Mutex as StdMutex, time::Duration};

    #[derive(Debug)]
    struct FakeProvider {
        calls: StdMutex<Vec<String>>,
        lookup_delays: HashMap<String, Duration>,
        current: std::result::Result<CurrentConditions, WeatherError>,
        forecast: std::result::Result<ForecastReport, WeatherError>,
        air: Option<AirQualityReport>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                lookup_delays: HashMap::new(),
                current: Ok(current("Paris", "FR")),
                forecast: Ok(forecast(10)),
                air: Some(AirQualityReport {
                    list: vec![AirQualitySample {
                        main: AirQualityMain { aqi: 2 },
                    }],
                }),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn lookup_locations(&self, query: &str) -> Result<Vec<LocationCandidate>> {
            self.record(format!("lookup:{query}"));
            if let Some(delay) = self.lookup_delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if query == "none" {
                return Ok(Vec::new());
            }
            Ok(vec![LocationCandidate {
                name: query.to_string(),
                country: "XX".into(),
                state: None,
                lat: None,
                lon: None,
            }])
        }

        async fn fetch_current_weather(&self, location: &str) -> Result<CurrentConditions> {
            self.record(format!("current:{location}"));
            self.current.clone()
        }

        async fn fetch_forecast(&self, location: &str) -> Result<ForecastReport> {
            self.record(format!("forecast:{location}"));
            self.forecast.clone()
        }

        async fn fetch_air_quality(&self, _lat: f64, _lon: f64) -> Option<AirQualityReport> {
            self.record("air".to_string());
            self.air.clone()
        }
    }

    fn current(name: &str, country: &str) -> CurrentConditions {
        CurrentConditions {
            name: name.into(),
            coord: Some(Coordinates {
                lat: 48.85,
                lon: 2.35,
            }),
            weather: vec![Condition {
                description: "overcast clouds".into(),
                icon: "04d".into(),
            }],
            main: MainReadings {
                temp: 12.3,
                feels_like: 11.0,
                pressure: 1009,
                humidity: 81,
            },
            wind: Wind {
                speed: 5.0,
                deg: Some(200.0),
            },
            sys: SunInfo {
                country: Some(country.into()),
                sunset: None,
            },
            timezone: Some(0),
        }
    }

    fn forecast(n: i64) -> ForecastReport {
        ForecastReport {
            list: (0..n)
                .map(|i| ForecastItem {
                    dt: 1_705_276_800 + i * 10_800,
                    main: ForecastMain { temp: 10.0 },
                    weather: vec![],
                })
                .collect(),
            city: ForecastCity { timezone: Some(0) },
        }
    }

    fn config() -> Config {
        Config::default()
    }

    fn controller(provider: FakeProvider) -> (Controller<Recorder>, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        let ctl = Controller::new(provider.clone(), Recorder::default(), &config());
        (ctl, provider)
    }

    fn suggestions_shown(updates: &[ViewUpdate]) -> Vec<Vec<String>> {
        updates
            .iter()
            .filter_map(|u| match u {
                ViewUpdate::Suggestions(c) => Some(c.iter().map(|c| c.name.clone()).collect()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn successful_search_populates_everything() {
        let (ctl, provider) = controller(FakeProvider::new());
        ctl.set_input("paris").await;

        let report = ctl.search().await.unwrap().unwrap();

        assert_eq!(report.snapshot.city_name, "Paris");
        assert_eq!(report.forecast.len(), 8);
        assert_eq!(report.air_quality.unwrap().qualitative_level, "Fair");
        assert_eq!(ctl.state().await, SearchState::Displayed);
        assert_eq!(
            provider.calls(),
            vec!["current:paris", "forecast:paris", "air"]
        );

        let view = ctl.view().await;
        let updates = &view.target().updates;
        assert_eq!(updates.first(), Some(&ViewUpdate::Loading(true)));
        assert_eq!(updates.last(), Some(&ViewUpdate::Loading(false)));
        assert!(updates.contains(&ViewUpdate::AirQuality {
            text: "Fair (2)".into(),
            color: Some("#8BC34A"),
        }));
        assert_eq!(
            view.loaded_video(),
            Some(config().videos.cloudy.as_str())
        );
    }

    #[tokio::test]
    async fn mismatch_stops_before_forecast_and_clears() {
        let mut fake = FakeProvider::new();
        fake.current = Ok(current("Paris", "FR"));
        let (ctl, provider) = controller(fake);
        ctl.set_input("Paris, US").await;

        let err = ctl.search().await.unwrap_err();

        assert!(matches!(err, WeatherError::CountryMismatch { .. }));
        assert_eq!(provider.calls(), vec!["current:Paris,US"]);
        assert_eq!(ctl.state().await, SearchState::Failed);

        let view = ctl.view().await;
        let t = view.target();
        assert!(t.updates.contains(&ViewUpdate::Alert(
            "Found Paris in FR instead of US.".into()
        )));
        assert_eq!(t.text(Field::Humidity), Some(PLACEHOLDER));
        assert_eq!(t.updates.last(), Some(&ViewUpdate::Loading(false)));
    }

    #[tokio::test]
    async fn forecast_failure_is_surfaced() {
        let mut fake = FakeProvider::new();
        fake.forecast = Err(WeatherError::Upstream("forecast down".into()));
        let (ctl, provider) = controller(fake);
        ctl.set_input("Paris").await;

        let err = ctl.search().await.unwrap_err();
        assert_eq!(err.to_string(), "forecast down");
        assert_eq!(provider.calls(), vec!["current:Paris", "forecast:Paris"]);

        let view = ctl.view().await;
        assert!(view
            .target()
            .updates
            .contains(&ViewUpdate::Alert("forecast down".into())));
        assert!(view.target().updates.contains(&ViewUpdate::HideIcon));
    }

    #[tokio::test]
    async fn missing_coordinates_skip_air_quality() {
        let mut fake = FakeProvider::new();
        let mut data = current("Paris", "FR");
        data.coord = None;
        fake.current = Ok(data);
        let (ctl, provider) = controller(fake);
        ctl.set_input("Paris").await;

        let report = ctl.search().await.unwrap().unwrap();
        assert!(report.air_quality.is_none());
        assert_eq!(provider.calls(), vec!["current:Paris", "forecast:Paris"]);
        assert!(ctl.view().await.target().updates.contains(&ViewUpdate::AirQuality {
            text: "Unavailable".into(),
            color: None,
        }));
    }

    #[tokio::test]
    async fn blank_input_alerts_without_calls() {
        let (ctl, provider) = controller(FakeProvider::new());
        ctl.set_input("   ").await;

        assert_eq!(ctl.search().await.unwrap(), None);
        assert!(provider.calls().is_empty());
        assert_eq!(ctl.state().await, SearchState::Idle);
        assert_eq!(
            ctl.view().await.target().updates,
            vec![ViewUpdate::Alert(EMPTY_INPUT_ALERT.into())]
        );
    }

    #[tokio::test]
    async fn search_ignored_while_loading() {
        let (ctl, provider) = controller(FakeProvider::new());
        ctl.set_input("Paris").await;
        *ctl.inner.state.lock().await = SearchState::Loading;

        assert_eq!(ctl.search().await.unwrap(), None);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_hides_dropdown_without_lookup() {
        let (ctl, provider) = controller(FakeProvider::new());

        ctl.on_input("p").await.await.unwrap();

        assert!(provider.calls().is_empty());
        assert_eq!(
            ctl.view().await.target().updates,
            vec![ViewUpdate::HideSuggestions]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_triggers_single_lookup() {
        let (ctl, provider) = controller(FakeProvider::new());

        let mut handles = Vec::new();
        for text in ["pa", "par", "pari", "paris"] {
            handles.push(ctl.on_input(text).await);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(provider.calls(), vec!["lookup:paris"]);
        assert_eq!(
            suggestions_shown(&ctl.view().await.target().updates),
            vec![vec!["paris".to_string()]]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_lookup_response_is_discarded() {
        let mut fake = FakeProvider::new();
        fake.lookup_delays
            .insert("lon".into(), Duration::from_millis(1_000));
        let (ctl, provider) = controller(fake);

        let slow = ctl.on_input("lon").await;
        // past the debounce window, so the first lookup is already in flight
        tokio::time::sleep(Duration::from_millis(400)).await;
        let fast = ctl.on_input("lond").await;
        fast.await.unwrap();
        slow.await.unwrap();

        assert_eq!(provider.calls(), vec!["lookup:lon", "lookup:lond"]);
        assert_eq!(
            suggestions_shown(&ctl.view().await.target().updates),
            vec![vec!["lond".to_string()]]
        );
    }

    #[tokio::test]
    async fn empty_lookup_hides_dropdown() {
        let (ctl, _) = controller(FakeProvider::new());
        ctl.set_input("none").await;
        ctl.suggest_now().await;

        assert_eq!(
            ctl.view().await.target().updates,
            vec![ViewUpdate::HideSuggestions]
        );
    }

    #[tokio::test]
    async fn focus_on_empty_input_does_nothing() {
        let (ctl, provider) = controller(FakeProvider::new());
        assert!(ctl.on_focus().await.is_none());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn focus_on_filled_input_reruns_lookup() {
        let (ctl, provider) = controller(FakeProvider::new());
        ctl.set_input("paris").await;

        let handle = ctl.on_focus().await.expect("lookup scheduled");
        handle.await.unwrap();

        assert_eq!(provider.calls(), vec!["lookup:paris"]);
        assert_eq!(
            suggestions_shown(&ctl.view().await.target().updates),
            vec![vec!["paris".to_string()]]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn outside_click_cancels_pending_lookup() {
        let (ctl, provider) = controller(FakeProvider::new());

        let pending = ctl.on_input("Paris").await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        ctl.on_outside_click().await;
        pending.await.unwrap();

        assert!(provider.calls().is_empty());
        assert_eq!(
            ctl.view().await.target().updates,
            vec![ViewUpdate::HideSuggestions]
        );
    }

    #[tokio::test]
    async fn outside_click_hides_dropdown() {
        let (ctl, _) = controller(FakeProvider::new());
        ctl.on_outside_click().await;
        assert_eq!(
            ctl.view().await.target().updates,
            vec![ViewUpdate::HideSuggestions]
        );
    }

    #[tokio::test]
    async fn selecting_suggestion_searches_it() {
        let (ctl, provider) = controller(FakeProvider::new());
        let candidate = LocationCandidate {
            name: "Paris".into(),
            country: "FR".into(),
            state: None,
            lat: None,
            lon: None,
        };

        let report = ctl.select_suggestion(&candidate).await.unwrap();

        assert!(report.is_some());
        assert_eq!(ctl.input().await, "Paris, FR");
        assert_eq!(provider.calls()[0], "current:Paris,FR");
        let view = ctl.view().await;
        assert_eq!(
            &view.target().updates[..2],
            &[
                ViewUpdate::InputValue("Paris, FR".into()),
                ViewUpdate::HideSuggestions
            ]
        );
    }
}
