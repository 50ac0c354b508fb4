// =============================================================================
// Market Analysis — rule-based sentiment from RSI, ADX and MACD
// =============================================================================
//
// Scoring:
//   RSI > 70            => -3   (overbought)
//   RSI < 30            => +3   (oversold)
//   MACD histogram > 0  => +2, otherwise -2
//   ADX > 25            => trend "Strong", score * 1.5
//
//   score >= 3 => BULLISH,  score <= -3 => BEARISH,  else NEUTRAL
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{adx::calculate_adx, ema::calculate_macd, rsi::latest_rsi, rsi::RsiZone};
use crate::types::{closes, PriceBar, Sentiment};

/// ADX above this marks a strong trend.
const STRONG_TREND_ADX: f64 = 25.0;

/// Indicator periods used by [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_adx_period")]
    pub adx_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

fn default_rsi_period() -> usize {
    14
}

fn default_adx_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            adx_period: default_adx_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

impl AnalysisParams {
    /// Reject periods that leave `analyze` permanently without a result.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("adx_period", self.adx_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(format!("{name} must be at least 1"));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Weak,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "Strong"),
            Self::Weak => write!(f, "Weak"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub interval: String,
    pub sentiment: Sentiment,
    pub trend_strength: TrendStrength,
    pub rsi: f64,
    pub adx: f64,
    pub macd_hist: f64,
    pub text: String,
}

/// Sentiment and trend strength for one set of readings.
pub fn score(rsi: f64, adx: f64, macd_hist: f64) -> (Sentiment, TrendStrength) {
    let mut strength = 0.0;

    if rsi > 70.0 {
        strength -= 3.0;
    } else if rsi < 30.0 {
        strength += 3.0;
    }

    strength += if macd_hist > 0.0 { 2.0 } else { -2.0 };

    let trend_strength = if adx > STRONG_TREND_ADX {
        strength *= 1.5;
        TrendStrength::Strong
    } else {
        TrendStrength::Weak
    };

    let sentiment = if strength >= 3.0 {
        Sentiment::Bullish
    } else if strength <= -3.0 {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    };

    (sentiment, trend_strength)
}

/// Analyse the latest bar of `bars`.
///
/// Returns `None` when any of RSI, ADX or MACD lacks history.
pub fn analyze(symbol: &str, interval: &str, bars: &[PriceBar], params: &AnalysisParams) -> Option<AnalysisReport> {
    let closes = closes(bars);
    let rsi = latest_rsi(&closes, params.rsi_period)?;
    let adx = calculate_adx(bars, params.adx_period)?;
    let macd_hist = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal)?.histogram;

    let (sentiment, trend_strength) = score(rsi, adx, macd_hist);
    let (hist_label, momentum) = if macd_hist > 0.0 {
        ("Positive", "Upward")
    } else {
        ("Negative", "Downward")
    };

    let text = format!(
        "Market Analysis for {symbol} ({interval}):\n\
         Sentiment: {sentiment}\n\
         Trend Strength: {trend_strength} (ADX: {adx:.2})\n\
         RSI is at {rsi:.2}, indicating market is {zone}.\n\
         MACD Histogram is {hist_label}, suggesting {momentum} momentum.",
        zone = RsiZone::classify(rsi),
    );

    Some(AnalysisReport {
        symbol: symbol.to_string(),
        interval: interval.to_string(),
        sentiment,
        trend_strength,
        rsi,
        adx,
        macd_hist,
        text,
    })
}
