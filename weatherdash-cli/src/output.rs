use std::fmt::Write;

use weatherdash_core::{HistoryEntry, WeatherRecord};

pub fn render_record(record: &WeatherRecord) -> String {
    let mut out = String::new();

    let coords = record
        .location
        .map(|p| format!(" ({:.2}, {:.2})", p.lat, p.lon))
        .unwrap_or_default();
    writeln!(out, "📍 {}{coords}", record.city).ok();
    writeln!(out, "   {}, {}°C", record.condition, record.temperature_c).ok();
    writeln!(out, "   Humidity {}% · Wind {} km/h", record.humidity_pct, record.wind_kph).ok();

    if !record.forecast.is_empty() {
        writeln!(out).ok();
        writeln!(out, "   {}-day forecast", record.forecast.len()).ok();
        for day in &record.forecast {
            writeln!(
                out,
                "   {}  {:>5.1}° / {:>5.1}°  {}",
                day.date.format("%a %Y-%m-%d"),
                day.max_c,
                day.min_c,
                day.condition
            )
            .ok();
        }
    }

    out
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::from("Recent searches:\n");
    for entry in entries {
        let mark = if entry.is_success() { "✔" } else { "❌" };
        writeln!(out, "  {mark} {entry}").ok();
    }
    out
}

pub fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return "No matching cities.\n".to_string();
    }
    suggestions.iter().map(|s| format!("  {s}\n")).collect()
}
