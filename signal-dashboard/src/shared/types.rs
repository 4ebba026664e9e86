/// Core data types for the signal dataset
///
/// These types match the JSON document written by the scan engine
/// (`web/data.json`), in both its enveloped and legacy bare-array shapes.

use serde::{Deserialize, Serialize};

/// One tracked ticker's aggregated sentiment record
///
/// `ticker` is the stable identity used for search and chart lookup.
/// Every other field is defaulted when absent from the payload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Signal {
    /// Ticker symbol (uppercase by convention, not enforced)
    pub ticker: String,
    /// Mean sentiment score, roughly in [-1, 1]
    #[serde(default)]
    pub avg_sentiment: f64,
    /// Opaque strength value, displayed verbatim
    #[serde(default)]
    pub signal_strength: serde_json::Value,
    /// Signed rate of change (positive = high velocity)
    #[serde(default)]
    pub velocity: f64,
    /// Flagged as not yet priced in by upstream news volume
    #[serde(default)]
    pub blind_spot: bool,
    /// Summary source descriptors
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    /// Current vs baseline search interest ratio
    #[serde(default)]
    pub trend_sentiment: Option<f64>,
    #[serde(default)]
    pub bullish_search_vol: Option<f64>,
    #[serde(default)]
    pub bearish_search_vol: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Estimated position size from the scan engine's risk sizing
    #[serde(default)]
    pub est_position_shares: Option<f64>,
    /// Analyst asymmetry rating, shape owned by the scan engine
    #[serde(default)]
    pub analyst_rating: Option<serde_json::Value>,
    /// Raw aggregation details (richer source list)
    #[serde(default)]
    pub details: Option<SignalDetails>,
}

impl Signal {
    /// Sources for the detail view: `details.sources` when present, else `sources`
    pub fn detail_sources(&self) -> &[SourceEntry] {
        self.details
            .as_ref()
            .and_then(|d| d.sources.as_deref())
            .unwrap_or(&self.sources)
    }
}

/// Raw aggregation details attached to a signal
///
/// Only `sources` is consumed; any other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SignalDetails {
    #[serde(default)]
    pub sources: Option<Vec<SourceEntry>>,
}

/// A single source descriptor: plain text or a richer record
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Text(String),
    Record(serde_json::Value),
}

impl SourceEntry {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SourceEntry::Text(text) => Some(text),
            SourceEntry::Record(_) => None,
        }
    }
}

impl std::fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceEntry::Text(text) => write!(f, "{}", text),
            SourceEntry::Record(value) => write!(f, "{}", value),
        }
    }
}

/// Scan metadata carried by the enveloped payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScanMetadata {
    #[serde(default)]
    pub last_scan: Option<String>,
}

/// The two accepted payload shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DatasetPayload {
    Enveloped {
        metadata: ScanMetadata,
        signals: Vec<Signal>,
    },
    Legacy(Vec<Signal>),
}

/// Normalised dataset: an immutable snapshot for the whole session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub signals: Vec<Signal>,
    pub last_scan: Option<String>,
}

impl From<DatasetPayload> for Dataset {
    fn from(payload: DatasetPayload) -> Self {
        match payload {
            DatasetPayload::Enveloped { metadata, signals } => Self {
                signals,
                last_scan: metadata.last_scan,
            },
            DatasetPayload::Legacy(signals) => Self {
                signals,
                last_scan: None,
            },
        }
    }
}
