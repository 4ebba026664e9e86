//! Display formatting for signal cards
//!
//! Every string a card shows is derived here so the widget layer only
//! deals with layout and colour. Zero-valued optional fields follow the
//! scan engine's convention of meaning "no data".

use crate::shared::types::Signal;

/// Sentiment colour threshold (either side of zero)
pub const SENTIMENT_THRESHOLD: f64 = 0.05;
/// Hype ratio above which a ticker is "hyped"
pub const HYPE_HOT: f64 = 1.5;
/// Hype ratio below which a ticker is "cooling"
pub const HYPE_COOL: f64 = 0.8;

/// Colour classification shared by sentiment and hype indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > SENTIMENT_THRESHOLD {
            Tone::Positive
        } else if sentiment < -SENTIMENT_THRESHOLD {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }

    pub fn from_hype(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r > HYPE_HOT => Tone::Positive,
            Some(r) if r < HYPE_COOL => Tone::Negative,
            _ => Tone::Neutral,
        }
    }
}

/// Number without a trailing `.0` for integral values
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// en-US grouped count with at most 3 fraction digits (`1234.5` -> `1,234.5`)
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let int_part = rounded.trunc() as u64;
    let frac = format!("{:.3}", rounded.fract());
    let frac = frac.trim_start_matches('0').trim_end_matches('0');
    let frac = if frac == "." { "" } else { frac };

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, grouped, frac)
}

/// `$12.34`, or blank when the price is absent or zero
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p != 0.0 => format!("${:.2}", p),
        _ => String::new(),
    }
}

/// Signed velocity delta, `+` prefixed when positive
pub fn format_velocity(velocity: f64) -> String {
    let sign = if velocity > 0.0 { "+" } else { "" };
    format!("{}{}", sign, format_number(velocity))
}

/// Opaque strength value as text
pub fn format_strength(strength: &serde_json::Value) -> String {
    match strength {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Hype ratio as `1.6x`, or a dash when absent or zero
pub fn format_hype(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r != 0.0 => format!("{:.1}x", r),
        _ => "-".to_string(),
    }
}

/// Everything one summary card displays
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub ticker: String,
    pub sentiment: String,
    pub sentiment_tone: Tone,
    pub price: String,
    pub strength: String,
    pub velocity: String,
    pub source_count: usize,
    pub hype: String,
    pub hype_tone: Tone,
    pub search_volume: String,
    pub blind_spot: bool,
}

impl CardView {
    pub fn from_signal(signal: &Signal) -> Self {
        Self {
            ticker: signal.ticker.clone(),
            sentiment: format!("{:.2}", signal.avg_sentiment),
            sentiment_tone: Tone::from_sentiment(signal.avg_sentiment),
            price: format_price(signal.current_price),
            strength: format_strength(&signal.signal_strength),
            velocity: format!("({})", format_velocity(signal.velocity)),
            source_count: signal.sources.len(),
            hype: format_hype(signal.trend_sentiment),
            hype_tone: Tone::from_hype(signal.trend_sentiment),
            search_volume: match signal.bullish_search_vol {
                Some(v) if v != 0.0 => format_count(v),
                _ => "-".to_string(),
            },
            blind_spot: signal.blind_spot,
        }
    }
}
