/// Signal Dashboard - Shared Library
///
/// Backs the `signal-dashboard` terminal binary, which renders the scan
/// engine's signal dataset as a grid of cards with search, category
/// filters and a per-ticker detail popup.
///
/// The library includes:
/// - Dataset types and the one-shot loader (file or HTTP)
/// - Aggregate metrics, filtering and card formatting
/// - Detail view model (source classification, bullish/bearish split)
/// - Chart collaborator interface and a Yahoo Finance history source
/// - Application state and ratatui rendering
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{Dataset, Signal, SignalDetails, SourceEntry};

pub use shared::config::DashboardConfig;
pub use shared::error::DashboardError;
pub use shared::loader::{load_dataset, load_or_empty, parse_dataset, DataSource};

pub use shared::filter::{filter_signals, SignalFilter};
pub use shared::format::{CardView, Tone};
pub use shared::metrics::SignalMetrics;

pub use shared::detail::{ClassifiedSource, SentimentSplit, SignalDetail, SourcePlatform};

pub use shared::chart::{
    ChartConfig, ChartContainer, ChartRequest, ChartSeries, ChartTheme, ChartWidget,
    PriceHistorySource, SpawnedChartWidget, YahooChartSource,
};

pub use shared::app::{App, HitTarget, InputMode, LoadState, Modal};
pub use shared::widget::{render_dashboard, DrawnLayout};
