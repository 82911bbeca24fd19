use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of leading forecast days the alert rules look at.
pub const FORECAST_WINDOW: usize = 3;

/// Latitude/longitude pair reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_c: f64,
    pub min_c: f64,
    pub condition: String,
    pub icon_url: String,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub condition: String,
    pub icon_url: String,
    /// Chronological, starting today.
    pub forecast: Vec<ForecastDay>,
    pub location: Option<GeoPoint>,
}

impl WeatherRecord {
    /// The leading slice of the forecast used for alert evaluation.
    /// Shorter than [`FORECAST_WINDOW`] when the provider returned fewer days.
    pub fn forecast_window(&self) -> &[ForecastDay] {
        let end = self.forecast.len().min(FORECAST_WINDOW);
        &self.forecast[..end]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn day(offset: u32, max_c: f64, condition: &str) -> ForecastDay {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1 + offset).expect("valid fixture date");
        ForecastDay {
            date,
            max_c,
            min_c: max_c - 8.0,
            condition: condition.to_string(),
            icon_url: "https://cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
        }
    }

    pub fn record(city: &str, temperature_c: f64, forecast: Vec<ForecastDay>) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            temperature_c,
            humidity_pct: 70,
            wind_kph: 12.5,
            condition: "Partly cloudy".to_string(),
            icon_url: "https://cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
            forecast,
            location: Some(GeoPoint { lat: 21.03, lon: 105.85 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn forecast_window_takes_first_three_days() {
        let forecast = (0..7).map(|i| day(i, 25.0 + i as f64, "Sunny")).collect();
        let rec = record("Hanoi", 27.0, forecast);

        let window = rec.forecast_window();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].max_c, 25.0);
        assert_eq!(window[2].max_c, 27.0);
    }

    #[test]
    fn forecast_window_is_shorter_for_short_forecasts() {
        let rec = record("Hue", 30.0, vec![day(0, 30.0, "Mist")]);
        assert_eq!(rec.forecast_window().len(), 1);

        let empty = record("Hue", 30.0, Vec::new());
        assert!(empty.forecast_window().is_empty());
    }
}
