/// Detail view model for a selected signal
///
/// Source classification, the bullish/bearish split, and the extra
/// scan-engine fields shown in the popup.

use crate::shared::format::{format_count, format_number, format_price};
use crate::shared::types::{Signal, SourceEntry};

/// Platform a source descriptor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePlatform {
    Reddit,
    TikTok,
    Twitter,
    News,
    Unknown,
}

impl SourcePlatform {
    /// Markers checked in order; a later match overrides an earlier one
    const MARKERS: [(&'static str, SourcePlatform); 4] = [
        ("Reddit", SourcePlatform::Reddit),
        ("TikTok", SourcePlatform::TikTok),
        ("Twitter", SourcePlatform::Twitter),
        ("news", SourcePlatform::News),
    ];

    /// Case-sensitive keyword containment
    pub fn classify(text: &str) -> Self {
        Self::MARKERS
            .iter()
            .rev()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, platform)| *platform)
            .unwrap_or(SourcePlatform::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourcePlatform::Reddit => "REDDIT",
            SourcePlatform::TikTok => "TIKTOK",
            SourcePlatform::Twitter => "TWITTER",
            SourcePlatform::News => "NEWS",
            SourcePlatform::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for SourcePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the popup's source list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSource {
    pub platform: SourcePlatform,
    pub text: String,
    /// Outbound link target when the text is an HTTP(S) URL
    pub link: Option<String>,
}

impl ClassifiedSource {
    pub fn from_entry(entry: &SourceEntry) -> Self {
        match entry.as_text() {
            Some(text) => {
                let is_url = text.starts_with("http://") || text.starts_with("https://");
                Self {
                    platform: SourcePlatform::classify(text),
                    text: text.to_string(),
                    link: is_url.then(|| text.to_string()),
                }
            }
            None => Self {
                platform: SourcePlatform::Unknown,
                text: entry.to_string(),
                link: None,
            },
        }
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Bullish vs bearish search volume split, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentSplit {
    pub bullish: f64,
    pub bearish: f64,
    pub bullish_pct: f64,
    pub bearish_pct: f64,
}

impl SentimentSplit {
    /// Even 50/50 split when both volumes are absent or zero
    pub fn from_volumes(bullish: Option<f64>, bearish: Option<f64>) -> Self {
        let bullish = bullish.unwrap_or(0.0);
        let bearish = bearish.unwrap_or(0.0);
        let total = bullish + bearish;

        let (bullish_pct, bearish_pct) = if total > 0.0 {
            (bullish * 100.0 / total, bearish * 100.0 / total)
        } else {
            (50.0, 50.0)
        };

        Self {
            bullish,
            bearish,
            bullish_pct,
            bearish_pct,
        }
    }

    pub fn bullish_label(&self) -> String {
        format_count(self.bullish)
    }

    pub fn bearish_label(&self) -> String {
        format_count(self.bearish)
    }

    /// Split `width` cells proportionally (bullish, bearish)
    pub fn bar_cells(&self, width: usize) -> (usize, usize) {
        let bull = ((self.bullish_pct / 100.0) * width as f64).round() as usize;
        let bull = bull.min(width);
        (bull, width - bull)
    }
}

/// Everything the detail popup shows for one signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDetail {
    pub ticker: String,
    pub price: String,
    pub sources: Vec<ClassifiedSource>,
    pub split: SentimentSplit,
    pub est_position_shares: Option<String>,
    pub analyst_rating: Option<String>,
}

impl SignalDetail {
    pub fn from_signal(signal: &Signal) -> Self {
        Self {
            ticker: signal.ticker.clone(),
            price: format_price(signal.current_price),
            sources: signal
                .detail_sources()
                .iter()
                .map(ClassifiedSource::from_entry)
                .collect(),
            split: SentimentSplit::from_volumes(
                signal.bullish_search_vol,
                signal.bearish_search_vol,
            ),
            est_position_shares: signal
                .est_position_shares
                .filter(|shares| *shares != 0.0)
                .map(format_number),
            analyst_rating: signal.analyst_rating.as_ref().and_then(|rating| match rating {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => n.as_f64().map(|v| format!("{:.2}", v)),
                other => Some(other.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_defaults_to_even() {
        let split = SentimentSplit::from_volumes(Some(0.0), Some(0.0));
        assert_eq!(split.bullish_pct, 50.0);
        assert_eq!(split.bearish_pct, 50.0);

        let split = SentimentSplit::from_volumes(None, None);
        assert_eq!(split.bullish_pct, 50.0);
        assert_eq!(split.bearish_pct, 50.0);
    }

    #[test]
    fn test_split_proportions() {
        let split = SentimentSplit::from_volumes(Some(30.0), Some(10.0));
        assert_eq!(split.bullish_pct, 75.0);
        assert_eq!(split.bearish_pct, 25.0);

        let split = SentimentSplit::from_volumes(Some(80.0), Some(20.0));
        assert_eq!(split.bullish_pct, 80.0);
        assert_eq!(split.bearish_pct, 20.0);

        let split = SentimentSplit::from_volumes(Some(12.0), None);
        assert_eq!(split.bullish_pct, 100.0);
        assert_eq!(split.bearish_pct, 0.0);
    }

    #[test]
    fn test_split_bar_cells() {
        let split = SentimentSplit::from_volumes(Some(30.0), Some(10.0));
        assert_eq!(split.bar_cells(40), (30, 10));
        assert_eq!(split.bar_cells(0), (0, 0));

        let split = SentimentSplit::from_volumes(Some(1.0), Some(0.0));
        assert_eq!(split.bar_cells(7), (7, 0));
    }

    #[test]
    fn test_split_labels() {
        let split = SentimentSplit::from_volumes(Some(15000.0), Some(250.0));
        assert_eq!(split.bullish_label(), "15,000");
        assert_eq!(split.bearish_label(), "250");
    }

    #[test]
    fn test_classify_platforms() {
        assert_eq!(SourcePlatform::classify("Reddit: wallstreetbets"), SourcePlatform::Reddit);
        assert_eq!(SourcePlatform::classify("TikTok/finance"), SourcePlatform::TikTok);
        assert_eq!(SourcePlatform::classify("Twitter/Nitter"), SourcePlatform::Twitter);
        assert_eq!(SourcePlatform::classify("google news"), SourcePlatform::News);
        assert_eq!(SourcePlatform::classify("reddit lowercase"), SourcePlatform::Unknown);
        assert_eq!(SourcePlatform::classify("Weather/Hail"), SourcePlatform::Unknown);
    }

    #[test]
    fn test_classify_later_marker_wins() {
        assert_eq!(
            SourcePlatform::classify("Reddit thread linking Twitter"),
            SourcePlatform::Twitter
        );
        assert_eq!(SourcePlatform::classify("TikTok news"), SourcePlatform::News);
    }

    #[test]
    fn test_classified_source_link_and_text() {
        let link = ClassifiedSource::from_entry(&SourceEntry::Text(
            "https://reddit.com/r/test/comments/123/test_post".to_string(),
        ));
        assert_eq!(link.link.as_deref(), Some("https://reddit.com/r/test/comments/123/test_post"));
        assert_eq!(link.platform, SourcePlatform::Unknown);

        let plain = ClassifiedSource::from_entry(&SourceEntry::Text("Weather/Hail".to_string()));
        assert!(!plain.is_link());
        assert_eq!(plain.platform, SourcePlatform::Unknown);
        assert_eq!(plain.text, "Weather/Hail");

        let record = ClassifiedSource::from_entry(&SourceEntry::Record(json!({"site": "Reddit"})));
        assert_eq!(record.platform, SourcePlatform::Unknown);
        assert!(!record.is_link());
    }

    #[test]
    fn test_signal_detail_from_signal() {
        let signal: Signal = serde_json::from_value(json!({
            "ticker": "ABC",
            "sources": ["summary only"],
            "bullish_search_vol": 80,
            "bearish_search_vol": 20,
            "est_position_shares": 12,
            "analyst_rating": 0.5,
            "details": { "sources": ["Reddit post", "https://example.com/news/abc"] }
        }))
        .unwrap();

        let detail = SignalDetail::from_signal(&signal);
        assert_eq!(detail.ticker, "ABC");
        assert_eq!(detail.sources.len(), 2);
        assert_eq!(detail.sources[0].platform, SourcePlatform::Reddit);
        assert_eq!(detail.sources[1].platform, SourcePlatform::News);
        assert!(detail.sources[1].is_link());
        assert_eq!(detail.split.bullish_pct, 80.0);
        assert_eq!(detail.est_position_shares.as_deref(), Some("12"));
        assert_eq!(detail.analyst_rating.as_deref(), Some("0.50"));
        assert_eq!(detail.price, "");
    }
}
