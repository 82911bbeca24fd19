//! Rule-based weather alerts.
//!
//! The forecast window is reduced to two signals (all condition texts joined
//! and lower-cased, and the mean of the daily maxima) and run through
//! [`RULES`] in order. The first rule that matches decides the alert.

use crate::model::{FORECAST_WINDOW, ForecastDay};

/// Mean daily maximum above which the heat alert fires.
pub const HEAT_THRESHOLD_C: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Rain,
    Storm,
    Heat,
    Snow,
    Cloudy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertDecision {
    pub kind: AlertKind,
    pub message: &'static str,
    pub icon: &'static str,
}

/// Signals derived once per window and shared by every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSignals {
    /// Lower-cased condition texts joined with spaces.
    pub text: String,
    /// `None` for an empty window.
    pub mean_max_c: Option<f64>,
}

impl ForecastSignals {
    pub fn from_window(window: &[ForecastDay]) -> Self {
        let text = window
            .iter()
            .map(|day| day.condition.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        let mean_max_c = (!window.is_empty())
            .then(|| window.iter().map(|day| day.max_c).sum::<f64>() / window.len() as f64);

        Self { text, mean_max_c }
    }

    fn mentions(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.text.contains(w))
    }

    fn is_hot(&self) -> bool {
        self.mean_max_c.is_some_and(|mean| mean > HEAT_THRESHOLD_C)
    }
}

pub struct AlertRule {
    pub matches: fn(&ForecastSignals) -> bool,
    pub decision: AlertDecision,
}

/// Alert rules in priority order.
pub const RULES: [AlertRule; 5] = [
    AlertRule {
        matches: |s| s.mentions(&["rain", "shower"]),
        decision: AlertDecision {
            kind: AlertKind::Rain,
            message: "Possible rain in the next few days — don’t forget your umbrella!",
            icon: "☔",
        },
    },
    AlertRule {
        matches: |s| s.mentions(&["storm", "thunder"]),
        decision: AlertDecision {
            kind: AlertKind::Storm,
            message: "Thunderstorms expected — be cautious outdoors!",
            icon: "⛈️",
        },
    },
    AlertRule {
        matches: |s| s.mentions(&["sunny"]) || s.is_hot(),
        decision: AlertDecision {
            kind: AlertKind::Heat,
            message: "High temperatures expected — stay hydrated and avoid direct sun!",
            icon: "🔥",
        },
    },
    AlertRule {
        matches: |s| s.mentions(&["snow"]),
        decision: AlertDecision {
            kind: AlertKind::Snow,
            message: "Snow is expected — stay warm and drive carefully!",
            icon: "❄️",
        },
    },
    AlertRule {
        matches: |s| s.mentions(&["cloud"]),
        decision: AlertDecision {
            kind: AlertKind::Cloudy,
            message: "Mostly cloudy skies ahead — mild weather expected.",
            icon: "🌤️",
        },
    },
];

/// Pick the alert for a forecast window, or `None` when nothing applies or
/// the user opted out.
///
/// Days beyond [`FORECAST_WINDOW`] are ignored; a shorter window is used as is.
pub fn classify(window: &[ForecastDay], alerts_enabled: bool) -> Option<AlertDecision> {
    if !alerts_enabled {
        return None;
    }

    let window = &window[..window.len().min(FORECAST_WINDOW)];
    let signals = ForecastSignals::from_window(window);

    RULES.iter().find(|rule| (rule.matches)(&signals)).map(|rule| rule.decision)
}
