// =============================================================================
// Shared types used across the Forex Insight service
// =============================================================================

use serde::{Deserialize, Serialize};

/// One OHLCV observation as delivered by the market-data collaborator.
///
/// `time` is an opaque ordering label; nothing in the indicator pipeline
/// interprets it. Series are expected oldest-first and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// A [`PriceBar`] annotated with the derived indicator values.
///
/// `None` means "not yet computable at this index" and is emitted on the wire
/// as an omitted field, so a consumer can tell it apart from a computed zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: PriceBar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_band: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_band: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
}

/// Close prices of `bars`, in order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Direction of price relative to its slow moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Coarse volatility bucket derived from ATR as a fraction of price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityBand {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for VolatilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Screener recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenerSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl std::fmt::Display for ScreenerSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG_BUY"),
            Self::Buy => write!(f, "BUY"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Sell => write!(f, "SELL"),
            Self::StrongSell => write!(f, "STRONG_SELL"),
        }
    }
}

/// Overall market sentiment reported by the analysis module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Trade direction attached to a crossover signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}
