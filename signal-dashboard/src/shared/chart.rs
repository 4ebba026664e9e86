//! Price chart collaborator for the detail popup
//!
//! The popup only knows the narrow [`ChartWidget`] interface: hand it a
//! symbol and a [`ChartContainer`] and it fills the container whenever data
//! arrives. Loading is fire-and-forget; failures are logged and otherwise
//! ignored, leaving the container empty.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::shared::error::DashboardError;

/// Default history endpoint (`{symbol}`, `{interval}`, `{range}` are substituted)
pub const DEFAULT_HISTORY_URL: &str =
    "https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?interval={interval}&range={range}";
pub const DEFAULT_CONTAINER_ID: &str = "price_chart";

/// Chart colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartTheme {
    #[default]
    Dark,
    Light,
}

impl ChartTheme {
    /// Lenient parse, unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ChartTheme::Light,
            _ => ChartTheme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartTheme::Dark => "dark",
            ChartTheme::Light => "light",
        }
    }
}

/// Static chart settings, combined with a symbol into a [`ChartRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Width as a percentage of the popup
    pub width_pct: u16,
    /// Height in terminal rows
    pub height: u16,
    /// Bar interval (`D`, `W`, `M`, or minutes such as `60`)
    pub interval: String,
    /// Zone the x-axis dates are shown in
    pub timezone: Tz,
    pub theme: ChartTheme,
    pub container_id: String,
    /// History endpoint template
    pub history_url: String,
    /// Lookback window passed to the history endpoint
    pub range: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_pct: 100,
            height: 10,
            interval: "D".to_string(),
            timezone: Tz::Etc__UTC,
            theme: ChartTheme::Dark,
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            history_url: DEFAULT_HISTORY_URL.to_string(),
            range: "6mo".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_history_url(mut self, url: impl Into<String>) -> Self {
        self.history_url = url.into();
        self
    }

    /// Full widget configuration for one symbol
    pub fn request(&self, symbol: &str, container_id: &str) -> ChartRequest {
        ChartRequest {
            width_pct: self.width_pct,
            height: self.height,
            symbol: symbol.to_string(),
            interval: self.interval.clone(),
            timezone: self.timezone,
            theme: self.theme,
            container_id: container_id.to_string(),
        }
    }
}

/// Configuration handed to the chart collaborator for one render
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub width_pct: u16,
    pub height: u16,
    pub symbol: String,
    pub interval: String,
    pub timezone: Tz,
    pub theme: ChartTheme,
    pub container_id: String,
}

/// Close price history for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub symbol: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ChartSeries {
    /// (min, max) close, None when empty
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, close)| *close).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|(_, close)| *close)
    }
}

#[derive(Debug, Default)]
struct ChartSlot {
    generation: u64,
    request: Option<ChartRequest>,
    series: Option<ChartSeries>,
}

/// What the popup draws from a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSnapshot {
    pub request: Option<ChartRequest>,
    pub series: Option<ChartSeries>,
}

/// Named, shared target a chart renders into
#[derive(Debug, Clone)]
pub struct ChartContainer {
    id: String,
    slot: Arc<Mutex<ChartSlot>>,
}

impl ChartContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slot: Arc::new(Mutex::new(ChartSlot::default())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Drop any previous rendering and start a new generation
    pub fn clear(&self, request: Option<ChartRequest>) -> u64 {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        slot.request = request;
        slot.series = None;
        slot.generation
    }

    /// Store a series if `generation` is still current; stale results are dropped
    pub fn fill(&self, generation: u64, series: ChartSeries) -> bool {
        let mut slot = self.slot.lock();
        if slot.generation != generation {
            return false;
        }
        slot.series = Some(series);
        true
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        let slot = self.slot.lock();
        ChartSnapshot {
            request: slot.request.clone(),
            series: slot.series.clone(),
        }
    }
}

/// External chart collaborator: `render(symbol, container)`, no return value
pub trait ChartWidget: Send + Sync {
    fn render(&self, symbol: &str, container: &ChartContainer);
}

/// Async source of price history
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    async fn fetch_history(&self, request: &ChartRequest) -> Result<ChartSeries, DashboardError>;
}

/// [`ChartWidget`] that clears the container and fills it from a
/// [`PriceHistorySource`] on a background task
pub struct SpawnedChartWidget<S> {
    source: Arc<S>,
    config: ChartConfig,
}

impl<S> SpawnedChartWidget<S>
where
    S: PriceHistorySource + 'static,
{
    pub fn new(source: S, config: ChartConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }
}

impl<S> ChartWidget for SpawnedChartWidget<S>
where
    S: PriceHistorySource + 'static,
{
    fn render(&self, symbol: &str, container: &ChartContainer) {
        let request = self.config.request(symbol, container.id());
        let generation = container.clear(Some(request.clone()));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime, skipping chart for {}", symbol);
            return;
        };

        let source = Arc::clone(&self.source);
        let container = container.clone();
        runtime.spawn(async move {
            match source.fetch_history(&request).await {
                Ok(series) => {
                    if !container.fill(generation, series) {
                        debug!("Discarded stale chart for {}", request.symbol);
                    }
                }
                Err(e) => debug!("Chart load failed for {}: {}", request.symbol, e),
            }
        });
    }
}

// ============================================================================
// Yahoo Finance chart endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    #[serde(default)]
    result: Option<Vec<YahooResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Map a widget interval to the endpoint's interval code
pub fn yahoo_interval(interval: &str) -> String {
    match interval {
        "D" | "1D" => "1d".to_string(),
        "W" | "1W" => "1wk".to_string(),
        "M" | "1M" => "1mo".to_string(),
        minutes if minutes.chars().all(|c| c.is_ascii_digit()) && !minutes.is_empty() => {
            format!("{}m", minutes)
        }
        other => other.to_string(),
    }
}

/// Parse a chart response body into a close series
pub fn parse_yahoo_chart(symbol: &str, body: &[u8]) -> Result<ChartSeries, DashboardError> {
    let response: YahooResponse = serde_json::from_slice(body)?;

    let points: Vec<(DateTime<Utc>, f64)> = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| {
            let closes = result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default();
            result
                .timestamp
                .into_iter()
                .zip(closes)
                .filter_map(|(ts, close)| Some((DateTime::from_timestamp(ts, 0)?, close?)))
                .collect()
        })
        .unwrap_or_default();

    if points.is_empty() {
        return Err(DashboardError::EmptyChart(symbol.to_string()));
    }

    Ok(ChartSeries {
        symbol: symbol.to_string(),
        points,
    })
}

/// History source backed by the Yahoo Finance chart endpoint
pub struct YahooChartSource {
    client: reqwest::Client,
    url_template: String,
    range: String,
}

impl YahooChartSource {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template: config.history_url.clone(),
            range: config.range.clone(),
        }
    }

    pub fn url_for(&self, request: &ChartRequest) -> String {
        let symbol: String = url::form_urlencoded::byte_serialize(request.symbol.as_bytes()).collect();
        self.url_template
            .replace("{symbol}", &symbol)
            .replace("{interval}", &yahoo_interval(&request.interval))
            .replace("{range}", &self.range)
    }
}

#[async_trait]
impl PriceHistorySource for YahooChartSource {
    async fn fetch_history(&self, request: &ChartRequest) -> Result<ChartSeries, DashboardError> {
        let response = self
            .client
            .get(self.url_for(request))
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DashboardError::Status(response.status()));
        }

        let body = response.bytes().await?;
        parse_yahoo_chart(&request.symbol, &body)
    }
}
