//! Wires the provider, the search history, the alert rules and the
//! suggestion index together behind one owned state object.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    alert::{AlertDecision, classify},
    error::{DashboardError, ProviderError, StorageError},
    history::{HistoryCache, HistoryEntry},
    model::WeatherRecord,
    presenter::Presenter,
    provider::WeatherProvider,
    storage::{self, KeyValueStore},
    suggest::SuggestionIndex,
    summary::SummaryClient,
};

/// A resolved lookup and the alert it raised, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub record: WeatherRecord,
    pub alert: Option<AlertDecision>,
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Box<dyn WeatherProvider>,
    store: Arc<dyn KeyValueStore>,
    history: HistoryCache,
    suggestions: SuggestionIndex,
    presenter: Box<dyn Presenter>,
    summary: Option<SummaryClient>,
}

impl Dashboard {
    /// Build the dashboard and load the stored search history.
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        store: Arc<dyn KeyValueStore>,
        suggestions: SuggestionIndex,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let history = HistoryCache::open(store.clone());
        Self { provider, store, history, suggestions, presenter, summary: None }
    }

    pub fn with_summary(mut self, client: SummaryClient) -> Self {
        self.summary = Some(client);
        self
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Look up `city`, record the outcome and evaluate the forecast alert.
    ///
    /// A failed lookup is recorded as a `Failure` entry before the error is
    /// returned. A blank city is rejected without touching the history.
    pub async fn search(&mut self, city: &str) -> Result<SearchOutcome, DashboardError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DashboardError::EmptyQuery);
        }

        let fetched = self.provider.fetch_by_city(city).await;

        // Nothing below awaits: record and persist happen back to back.
        let result = match fetched {
            Ok(record) => {
                self.history.record(HistoryEntry::success(city, record.temperature_c));
                Ok(self.evaluate(record))
            }
            Err(err) => {
                self.history.record(HistoryEntry::failure(city));
                Err(DashboardError::Provider(err))
            }
        };
        self.persist_history();

        result
    }

    /// Look up weather at a coordinate pair. Coordinate lookups are not
    /// part of the search history.
    pub async fn locate(&self, lat: f64, lon: f64) -> Result<SearchOutcome, ProviderError> {
        let record = self.provider.fetch_by_coords(lat, lon).await?;
        Ok(self.evaluate(record))
    }

    pub fn suggestion_index(&self) -> &SuggestionIndex {
        &self.suggestions
    }

    /// Suggestions for the current input; empty input hides them.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        self.suggestions.suggest(query, self.history.entries())
    }

    /// Offer the suggestions for `query` through the presenter.
    pub fn pick_suggestion(&self, query: &str) -> Option<String> {
        let suggestions = self.suggest(query);
        if suggestions.is_empty() {
            return None;
        }
        self.presenter.present_suggestions(&suggestions)
    }

    pub fn clear_history(&mut self) -> Result<(), StorageError> {
        info!("clearing search history");
        self.history.clear()
    }

    pub fn alerts_enabled(&self) -> bool {
        storage::alerts_enabled(self.store.as_ref())
    }

    pub fn set_alerts_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        storage::set_alerts_enabled(self.store.as_ref(), enabled)
    }

    /// AI summary of `record`, or `None` when no proxy is configured or the
    /// request failed.
    pub async fn summarize(&self, record: &WeatherRecord) -> Option<String> {
        let client = self.summary.as_ref()?;
        match client.summarize(record).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!(error = %err, endpoint = client.endpoint(), "AI summary unavailable");
                None
            }
        }
    }

    fn evaluate(&self, record: WeatherRecord) -> SearchOutcome {
        let alert = classify(record.forecast_window(), self.alerts_enabled());
        if let Some(alert) = &alert {
            self.presenter.present_alert(alert);
        }
        SearchOutcome { record, alert }
    }

    /// Durable writes are best effort; the in-memory history stays as is.
    fn persist_history(&self) {
        if let Err(err) = self.history.persist() {
            warn!(error = %err, "failed to persist search history");
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::{RecordingPresenter, TableProvider};
    use super::*;
    use crate::{
        alert::AlertKind,
        model::fixtures::{day, record},
        storage::{ALERTS_KEY, HISTORY_KEY, MemoryStore},
    };

    fn cities(dashboard: &Dashboard) -> Vec<String> {
        dashboard.history().iter().map(|e| e.city().to_string()).collect()
    }

    fn dashboard(
        provider: TableProvider,
        store: Arc<dyn KeyValueStore>,
    ) -> (Dashboard, RecordingPresenter) {
        let presenter = RecordingPresenter::default();
        let dash = Dashboard::new(
            Box::new(provider),
            store,
            SuggestionIndex::new(["Hanoi", "Hue"]),
            Box::new(presenter.clone()),
        );
        (dash, presenter)
    }

    #[tokio::test]
    async fn six_searches_evict_the_first_and_clear_empties_storage() {
        let names = ["A", "B", "C", "D", "E", "F"];
        let provider =
            TableProvider::with(names.map(|c| record(c, 20.0, vec![day(0, 22.0, "Clear")])));
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let (mut dash, _) = dashboard(provider, store.clone());

        for name in names {
            dash.search(name).await.unwrap();
        }
        assert_eq!(cities(&dash), ["F", "E", "D", "C", "B"]);

        dash.clear_history().unwrap();
        assert!(dash.history().is_empty());
        assert!(HistoryCache::open(store).is_empty());
    }

    #[tokio::test]
    async fn failed_search_is_recorded_and_persisted() {
        let provider = TableProvider::with([record("Hanoi", 31.0, vec![day(0, 33.0, "Clear")])]);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let (mut dash, _) = dashboard(provider, store.clone());

        dash.search("Hanoi").await.unwrap();
        let err = dash.search("Atlantis").await.unwrap_err();

        assert!(matches!(err, DashboardError::Provider(_)));
        assert_eq!(err.to_string(), "City not found or API error!");
        assert_eq!(
            dash.history(),
            [HistoryEntry::failure("Atlantis"), HistoryEntry::success("Hanoi", 31.0)]
        );

        let raw = store.get(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"["Atlantis → Not found","Hanoi → 31°C"]"#);
    }

    #[tokio::test]
    async fn blank_search_is_rejected_without_recording() {
        let (mut dash, _) = dashboard(TableProvider::default(), Arc::new(MemoryStore::new()));

        let err = dash.search("   ").await.unwrap_err();

        assert!(matches!(err, DashboardError::EmptyQuery));
        assert!(dash.history().is_empty());
    }

    #[tokio::test]
    async fn search_records_trimmed_input_city() {
        let provider = TableProvider::with([record("Hue", 27.5, Vec::new())]);
        let (mut dash, _) = dashboard(provider, Arc::new(MemoryStore::new()));

        dash.search("  Hue ").await.unwrap();

        assert_eq!(dash.history(), [HistoryEntry::success("Hue", 27.5)]);
    }

    #[tokio::test]
    async fn search_raises_alert_through_presenter() {
        let forecast = vec![day(0, 25.0, "Sunny"), day(1, 24.0, "Patchy rain nearby")];
        let provider = TableProvider::with([record("Hanoi", 31.0, forecast)]);
        let (mut dash, presenter) = dashboard(provider, Arc::new(MemoryStore::new()));

        let outcome = dash.search("Hanoi").await.unwrap();

        assert_eq!(outcome.alert.map(|a| a.kind), Some(AlertKind::Rain));
        let shown = presenter.alerts.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].icon, "☔");
    }

    #[tokio::test]
    async fn alerts_flag_off_suppresses_alerts() {
        let provider = TableProvider::with([record("Hanoi", 35.0, vec![day(0, 36.0, "Sunny")])]);
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let (mut dash, presenter) = dashboard(provider, store.clone());

        assert!(dash.alerts_enabled());
        dash.set_alerts_enabled(false).unwrap();
        assert_eq!(store.get(ALERTS_KEY).unwrap().as_deref(), Some("off"));

        let outcome = dash.search("Hanoi").await.unwrap();
        assert_eq!(outcome.alert, None);
        assert!(presenter.alerts.lock().unwrap().is_empty());

        dash.set_alerts_enabled(true).unwrap();
        assert!(dash.alerts_enabled());
    }

    #[tokio::test]
    async fn locate_classifies_but_leaves_history_alone() {
        let provider = TableProvider::with([record("Hanoi", 31.0, vec![day(0, 33.0, "Snow")])]);
        let (dash, _) = dashboard(provider, Arc::new(MemoryStore::new()));

        let outcome = dash.locate(21.03, 105.85).await.unwrap();

        assert_eq!(outcome.record.city, "Hanoi");
        assert_eq!(outcome.alert.map(|a| a.kind), Some(AlertKind::Heat));
        assert!(dash.history().is_empty());

        assert!(dash.locate(0.0, 0.0).await.is_err());
    }

    #[tokio::test]
    async fn suggestions_include_searched_cities() {
        let provider = TableProvider::with([record("Haiphong", 29.0, Vec::new())]);
        let (mut dash, presenter) = dashboard(provider, Arc::new(MemoryStore::new()));

        dash.search("Haiphong").await.unwrap();
        dash.search("Hamburg").await.unwrap_err();

        let mut got = dash.suggest("ha");
        got.sort();
        assert_eq!(got, ["Haiphong", "Hamburg", "Hanoi"]);
        assert!(dash.suggest("").is_empty());

        assert_eq!(dash.pick_suggestion("hue").as_deref(), Some("Hue"));
        assert_eq!(dash.pick_suggestion("zz"), None);
        assert_eq!(presenter.offered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn history_is_loaded_from_store_on_start() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, r#"["Hue → 27°C"]"#).unwrap();

        let (dash, _) = dashboard(TableProvider::default(), store);

        assert_eq!(dash.history(), [HistoryEntry::success("Hue", 27.0)]);
    }

    #[tokio::test]
    async fn summarize_without_client_is_none() {
        let (dash, _) = dashboard(TableProvider::default(), Arc::new(MemoryStore::new()));
        assert_eq!(dash.summarize(&record("Hue", 27.0, Vec::new())).await, None);
    }
}
