use std::path::PathBuf;

/// Any failed weather lookup. The dashboard does not tell an unknown city
/// apart from a network or upstream failure; `detail` is kept for logs only.
#[derive(Debug, thiserror::Error)]
#[error("City not found or API error!")]
pub struct ProviderError {
    detail: String,
}

impl ProviderError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<anyhow::Error> for ProviderError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Failures of the durable key-value slots.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Failed to remove {}: {source}", .path.display())]
    Remove { path: PathBuf, source: std::io::Error },
    #[error("Failed to encode slot '{key}': {source}")]
    Encode { key: String, source: serde_json::Error },
}

/// Failures talking to the AI summary proxy.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Summary request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Summary proxy answered with status {0}")]
    Status(u16),
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Please enter a city.")]
    EmptyQuery,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
