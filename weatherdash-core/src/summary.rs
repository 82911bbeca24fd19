//! Client for the AI summary proxy.
//!
//! The proxy accepts `{"context": "<text>"}` and answers `{"summary": "<text>"}`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::SummaryError, model::WeatherRecord};

pub const FALLBACK_SUMMARY: &str = "No AI summary available.";

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SummaryClient {
    endpoint: String,
    http: Client,
}

impl SummaryClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SummaryError> {
        let http = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self { endpoint: endpoint.into(), http })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the proxy for a short plain-text summary of `record`.
    pub async fn summarize(&self, record: &WeatherRecord) -> Result<String, SummaryError> {
        let context = build_context(record);
        debug!(endpoint = %self.endpoint, city = %record.city, "requesting AI summary");

        let res = self
            .http
            .post(&self.endpoint)
            .json(&SummaryRequest { context: &context })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(SummaryError::Status(status.as_u16()));
        }

        let body: SummaryResponse = res.json().await?;
        Ok(body
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_SUMMARY.to_string()))
    }
}

/// Plain-text description of a record handed to the language model.
pub fn build_context(record: &WeatherRecord) -> String {
    let condition =
        record.forecast.first().map_or(record.condition.as_str(), |day| day.condition.as_str());

    let forecast = record
        .forecast
        .iter()
        .map(|day| format!("{}: {} ({}/{}°C)", day.date, day.condition, day.max_c, day.min_c))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "City: {}\nCondition: {}\nTemperature: {}°C\nHumidity: {}%\nWind: {} km/h\nForecast: {}",
        record.city, condition, record.temperature_c, record.humidity_pct, record.wind_kph, forecast
    )
}
