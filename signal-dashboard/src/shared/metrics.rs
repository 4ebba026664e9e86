/// Aggregate metrics over the loaded signal list
///
/// Computed once after load. The list is never mutated, so there is no
/// incremental update path.

use crate::shared::types::Signal;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalMetrics {
    pub total: usize,
    pub blind_spots: usize,
    pub mean_sentiment: f64,
}

impl SignalMetrics {
    pub fn summarize(signals: &[Signal]) -> Self {
        let total = signals.len();
        let blind_spots = signals.iter().filter(|s| s.blind_spot).count();
        // Seeded with +0.0 so an empty list reads "0.000", not "-0.000"
        let sum = signals.iter().fold(0.0, |acc, s| acc + s.avg_sentiment);

        Self {
            total,
            blind_spots,
            mean_sentiment: sum / total.max(1) as f64,
        }
    }

    /// Mean sentiment at 3 decimal places
    pub fn mean_sentiment_label(&self) -> String {
        format!("{:.3}", self.mean_sentiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signal(ticker: &str, sentiment: f64, blind_spot: bool) -> Signal {
        serde_json::from_value(json!({
            "ticker": ticker,
            "avg_sentiment": sentiment,
            "blind_spot": blind_spot,
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_list() {
        let metrics = SignalMetrics::summarize(&[]);
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.blind_spots, 0);
        assert_eq!(metrics.mean_sentiment, 0.0);
        assert!(metrics.mean_sentiment.is_sign_positive());
        assert_eq!(metrics.mean_sentiment_label(), "0.000");
    }

    #[test]
    fn test_summary() {
        let signals = vec![
            signal("AAA", 0.5, true),
            signal("BBB", -0.2, false),
            signal("CCC", 0.3, true),
            signal("DDD", 0.0, false),
        ];
        let metrics = SignalMetrics::summarize(&signals);

        assert_eq!(metrics.total, signals.len());
        assert_eq!(metrics.blind_spots, 2);
        assert!(metrics.blind_spots <= metrics.total);
        assert!((metrics.mean_sentiment - 0.15).abs() < 1e-12);
        assert_eq!(metrics.mean_sentiment_label(), "0.150");
    }

    #[test]
    fn test_single_signal_label() {
        let metrics = SignalMetrics::summarize(&[signal("ABC", 0.1, false)]);
        assert_eq!(metrics.mean_sentiment_label(), "0.100");
    }
}
