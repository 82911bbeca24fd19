use crate::{Config, ProviderError, WeatherRecord, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of weather records.
///
/// Every upstream failure, whether network, HTTP status, payload or unknown
/// city, is reported as the same [`ProviderError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_city(&self, city: &str) -> Result<WeatherRecord, ProviderError>;

    async fn fetch_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherRecord, ProviderError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No WeatherAPI.com key configured.\n\
             Hint: run `weatherdash configure` or set the {} environment variable.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(Box::new(WeatherApiProvider::new(api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if cfg.api_key().is_some() {
            // key leaked in from the environment
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No WeatherAPI.com key configured"));
        assert!(msg.contains("Hint: run `weatherdash configure`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
