/// Dashboard configuration
///
/// Read once at startup from environment variables. Every value has a
/// default so the binary runs with no environment at all.

use std::path::PathBuf;

use chrono_tz::Tz;

use crate::shared::chart::{ChartConfig, ChartTheme};
use crate::shared::error::DashboardError;
use crate::shared::filter::SignalFilter;
use crate::shared::loader::DataSource;

/// Default dataset location, as written by the scan engine
pub const DEFAULT_DATA_SOURCE: &str = "web/data.json";
/// Default log file (logs never go to the terminal while the TUI is up)
pub const DEFAULT_LOG_FILE: &str = "signal-dashboard.log";

/// Top-level dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Where the dataset is read from (file path or HTTP(S) URL)
    pub data_source: DataSource,
    /// File receiving `tracing` output
    pub log_file: PathBuf,
    /// Category filter active at startup
    pub filter: SignalFilter,
    /// External chart collaborator settings
    pub chart: ChartConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::File(PathBuf::from(DEFAULT_DATA_SOURCE)),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            filter: SignalFilter::All,
            chart: ChartConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Build configuration from process environment
    ///
    /// `SIGNAL_DATA`, `SIGNAL_LOG_FILE`, `SIGNAL_FILTER`, `CHART_URL`,
    /// `CHART_INTERVAL`, `CHART_TIMEZONE` (IANA name), `CHART_THEME`.
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(source) = lookup("SIGNAL_DATA") {
            config.data_source = source.parse()?;
        }
        if let Some(path) = lookup("SIGNAL_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        if let Some(filter) = lookup("SIGNAL_FILTER") {
            config.filter = filter.trim().parse()?;
        }
        if let Some(url) = lookup("CHART_URL") {
            config.chart = config.chart.with_history_url(url);
        }
        if let Some(interval) = lookup("CHART_INTERVAL") {
            config.chart = config.chart.with_interval(interval);
        }
        if let Some(timezone) = lookup("CHART_TIMEZONE") {
            let tz: Tz = timezone
                .trim()
                .parse()
                .map_err(|_| DashboardError::InvalidTimezone(timezone.clone()))?;
            config.chart = config.chart.with_timezone(tz);
        }
        if let Some(theme) = lookup("CHART_THEME") {
            config.chart = config.chart.with_theme(ChartTheme::from_name(&theme));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_empty_environment() {
        let config = DashboardConfig::from_lookup(|_| None).unwrap();
        assert_eq!(
            config.data_source,
            DataSource::File(PathBuf::from("web/data.json"))
        );
        assert_eq!(config.log_file, PathBuf::from("signal-dashboard.log"));
        assert_eq!(config.chart.interval, "D");
        assert_eq!(config.filter, SignalFilter::All);
        assert_eq!(config.chart.timezone, Tz::Etc__UTC);
        assert_eq!(config.chart.theme, ChartTheme::Dark);
    }

    #[test]
    fn test_environment_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("SIGNAL_DATA", "https://example.com/data.json"),
            ("SIGNAL_LOG_FILE", "/tmp/dash.log"),
            ("SIGNAL_FILTER", "blind-spot"),
            ("CHART_INTERVAL", "W"),
            ("CHART_TIMEZONE", "America/New_York"),
            ("CHART_THEME", "light"),
        ]))
        .unwrap();

        assert_eq!(config.filter, SignalFilter::BlindSpot);
        assert_eq!(config.chart.timezone, Tz::America__New_York);
        assert!(matches!(config.data_source, DataSource::Http(_)));
        assert_eq!(config.log_file, PathBuf::from("/tmp/dash.log"));
        assert_eq!(config.chart.interval, "W");
        assert_eq!(config.chart.theme, ChartTheme::Light);
    }

    #[test]
    fn test_invalid_data_source_rejected() {
        let result = DashboardConfig::from_lookup(lookup_from(&[("SIGNAL_DATA", "  ")]));
        assert!(matches!(result, Err(DashboardError::InvalidSource(_))));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result =
            DashboardConfig::from_lookup(lookup_from(&[("CHART_TIMEZONE", "Mars/Olympus")]));
        assert!(matches!(
            result,
            Err(DashboardError::InvalidTimezone(name)) if name == "Mars/Olympus"
        ));
    }

    #[test]
    fn test_unknown_filter_rejected() {
        let result = DashboardConfig::from_lookup(lookup_from(&[("SIGNAL_FILTER", "hot")]));
        assert!(matches!(result, Err(DashboardError::UnknownFilter(_))));
    }
}
