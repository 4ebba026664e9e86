use std::path::PathBuf;
use thiserror::Error;

/// All errors generated in `signal-dashboard`.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("JSON parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid data source: {0}")]
    InvalidSource(String),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("chart history empty for {0}")]
    EmptyChart(String),
}
