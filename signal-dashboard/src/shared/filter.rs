/// Search and category filtering of the signal list
///
/// The filtered view is a pure function of (list, search, filter). Input
/// order is preserved; nothing is sorted.

use std::str::FromStr;

use crate::shared::error::DashboardError;
use crate::shared::types::Signal;

/// Category filter selected from the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalFilter {
    #[default]
    All,
    /// `velocity > 0`
    HighVelocity,
    /// `blind_spot == true`
    BlindSpot,
}

impl SignalFilter {
    /// Filter bar order
    pub const ALL: [SignalFilter; 3] = [
        SignalFilter::All,
        SignalFilter::HighVelocity,
        SignalFilter::BlindSpot,
    ];

    /// Data-attribute name
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalFilter::All => "all",
            SignalFilter::HighVelocity => "high-velocity",
            SignalFilter::BlindSpot => "blind-spot",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            SignalFilter::All => "ALL",
            SignalFilter::HighVelocity => "HIGH VELOCITY",
            SignalFilter::BlindSpot => "BLIND SPOTS",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SignalFilter::All => SignalFilter::HighVelocity,
            SignalFilter::HighVelocity => SignalFilter::BlindSpot,
            SignalFilter::BlindSpot => SignalFilter::All,
        }
    }

    pub fn matches(&self, signal: &Signal) -> bool {
        match self {
            SignalFilter::All => true,
            SignalFilter::HighVelocity => signal.velocity > 0.0,
            SignalFilter::BlindSpot => signal.blind_spot,
        }
    }
}

impl FromStr for SignalFilter {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SignalFilter::All),
            "high-velocity" => Ok(SignalFilter::HighVelocity),
            "blind-spot" => Ok(SignalFilter::BlindSpot),
            other => Err(DashboardError::UnknownFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for SignalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive substring match against the ticker
pub fn matches_search(signal: &Signal, search: &str) -> bool {
    signal
        .ticker
        .to_lowercase()
        .contains(&search.to_lowercase())
}

/// Apply search text and category filter, preserving input order
pub fn filter_signals<'a>(
    signals: &'a [Signal],
    search: &str,
    filter: SignalFilter,
) -> Vec<&'a Signal> {
    signals
        .iter()
        .filter(|s| matches_search(s, search) && filter.matches(s))
        .collect()
}
