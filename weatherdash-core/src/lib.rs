//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - The bounded search history and its durable storage
//! - Rule-based forecast alerts
//! - City autocomplete over a static dictionary plus past searches
//! - The WeatherAPI.com provider and the AI summary client
//!
//! It is used by `weatherdash-cli`, but has no terminal dependency and can be
//! embedded in other front ends.

pub mod alert;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod storage;
pub mod suggest;
pub mod summary;

pub use alert::{AlertDecision, AlertKind, classify};
pub use config::Config;
pub use dashboard::{Dashboard, SearchOutcome};
pub use error::{DashboardError, ProviderError, StorageError, SummaryError};
pub use history::{HISTORY_CAPACITY, HistoryCache, HistoryEntry};
pub use model::{ForecastDay, GeoPoint, WeatherRecord};
pub use presenter::{Presenter, SilentPresenter};
pub use provider::{WeatherProvider, provider_from_config};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use suggest::SuggestionIndex;
pub use summary::SummaryClient;
