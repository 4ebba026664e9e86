//! Dataset loader
//!
//! Performs exactly one read of the dataset at startup, from a local file or
//! an HTTP(S) endpoint, and normalises both payload shapes into a [`Dataset`].
//! No retry, no timeout: a failed load is logged and leaves the list empty.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{error, info};
use url::Url;

use crate::shared::error::DashboardError;
use crate::shared::types::{Dataset, DatasetPayload};

/// Where the dataset document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(Url),
    File(PathBuf),
}

impl FromStr for DataSource {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DashboardError::InvalidSource(s.to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url =
                Url::parse(trimmed).map_err(|e| DashboardError::InvalidSource(e.to_string()))?;
            Ok(DataSource::Http(url))
        } else {
            Ok(DataSource::File(PathBuf::from(trimmed)))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Http(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl DataSource {
    /// Read the raw document body
    pub async fn fetch(&self) -> Result<Vec<u8>, DashboardError> {
        match self {
            DataSource::Http(url) => {
                let response = reqwest::Client::new().get(url.clone()).send().await?;

                if !response.status().is_success() {
                    return Err(DashboardError::Status(response.status()));
                }

                Ok(response.bytes().await?.to_vec())
            }
            DataSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| DashboardError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Parse a dataset document, accepting the enveloped or the legacy shape
pub fn parse_dataset(body: &[u8]) -> Result<Dataset, DashboardError> {
    let payload: DatasetPayload = serde_json::from_slice(body)?;
    Ok(Dataset::from(payload))
}

/// Fetch and parse the dataset once
pub async fn load_dataset(source: &DataSource) -> Result<Dataset, DashboardError> {
    let body = source.fetch().await?;
    parse_dataset(&body)
}

/// Fetch the dataset, logging any failure and falling back to an empty list
pub async fn load_or_empty(source: &DataSource) -> Dataset {
    match load_dataset(source).await {
        Ok(dataset) => {
            info!(
                "Loaded {} signals from {} (last scan: {})",
                dataset.signals.len(),
                source,
                dataset.last_scan.as_deref().unwrap_or("n/a")
            );
            dataset
        }
        Err(e) => {
            error!("Error loading data from {}: {}", source, e);
            Dataset::default()
        }
    }
}
