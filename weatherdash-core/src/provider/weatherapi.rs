use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::ProviderError,
    model::{ForecastDay, GeoPoint, WeatherRecord},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Days of forecast requested per lookup.
pub const FORECAST_DAYS: u8 = 7;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key: api_key.into(), base_url, http: Client::new() }
    }

    /// `q` is either a city name or a `"lat,lon"` pair.
    async fn fetch_forecast(&self, q: &str) -> Result<WeatherRecord> {
        let url = format!("{}/forecast.json", self.base_url);
        let days = FORECAST_DAYS.to_string();

        debug!(q, "requesting WeatherAPI forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", q),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (forecast)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI forecast response body")?;

        if !status.is_success() {
            let reason = serde_json::from_str::<WaErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate_body(&body));
            return Err(anyhow::anyhow!(
                "WeatherAPI forecast request failed with status {status}: {reason}"
            ));
        }

        let parsed: WaForecastResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI forecast JSON")?;

        Ok(parsed.into_record())
    }

    async fn lookup(&self, q: &str) -> Result<WeatherRecord, ProviderError> {
        self.fetch_forecast(q).await.map_err(|err| {
            let detail = format!("{err:#}");
            warn!(q, error = %detail, "weather lookup failed");
            ProviderError::from(err)
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl WaForecastResponse {
    fn into_record(self) -> WeatherRecord {
        let forecast = self
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| ForecastDay {
                date: fd.date,
                max_c: fd.day.maxtemp_c,
                min_c: fd.day.mintemp_c,
                condition: fd.day.condition.text,
                icon_url: absolute_icon_url(&fd.day.condition.icon),
            })
            .collect();

        WeatherRecord {
            city: self.location.name,
            temperature_c: self.current.temp_c,
            humidity_pct: self.current.humidity,
            wind_kph: self.current.wind_kph,
            condition: self.current.condition.text,
            icon_url: absolute_icon_url(&self.current.condition.icon),
            forecast,
            location: Some(GeoPoint { lat: self.location.lat, lon: self.location.lon }),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_by_city(&self, city: &str) -> Result<WeatherRecord, ProviderError> {
        self.lookup(city).await
    }

    async fn fetch_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherRecord, ProviderError> {
        self.lookup(&format!("{lat},{lon}")).await
    }
}

/// WeatherAPI.com hands out protocol-relative icon paths (`//cdn...`).
fn absolute_icon_url(icon: &str) -> String {
    if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_string() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
