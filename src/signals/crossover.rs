// =============================================================================
// Moving-Average Crossover — Golden Cross / Death Cross
// =============================================================================
//
// Compares a fast and a slow SMA on the last two bars of a series:
//   fast crosses above slow  => GOLDEN CROSS (BUY)
//   fast crosses below slow  => DEATH CROSS  (SELL)
//
// A touch (equality on the previous bar) is not a cross.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::calculate_sma;
use crate::types::{closes, PriceBar, TradeAction};

/// Which way the moving averages crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossKind {
    #[serde(rename = "GOLDEN CROSS")]
    GoldenCross,
    #[serde(rename = "DEATH CROSS")]
    DeathCross,
}

impl std::fmt::Display for CrossKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GoldenCross => write!(f, "GOLDEN CROSS"),
            Self::DeathCross => write!(f, "DEATH CROSS"),
        }
    }
}

/// A crossover detected on the most recent bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSignal {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: CrossKind,
    pub action: TradeAction,
    /// `time` label of the bar on which the cross completed.
    pub timestamp: String,
}

/// Detect a fast/slow SMA crossover on the last bar of `bars`.
///
/// Returns `None` when there is no cross, or when either average is not yet
/// available on both of the last two bars.
pub fn detect_crossover(symbol: &str, bars: &[PriceBar], fast: usize, slow: usize) -> Option<CrossSignal> {
    let n = bars.len();
    if n < 2 {
        return None;
    }

    let closes = closes(bars);
    let fast_sma = calculate_sma(&closes, fast);
    let slow_sma = calculate_sma(&closes, slow);

    let fast_now = fast_sma[n - 1]?;
    let slow_now = slow_sma[n - 1]?;
    let fast_prev = fast_sma[n - 2]?;
    let slow_prev = slow_sma[n - 2]?;

    let (kind, action) = if fast_now > slow_now && fast_prev < slow_prev {
        (CrossKind::GoldenCross, TradeAction::Buy)
    } else if fast_now < slow_now && fast_prev > slow_prev {
        (CrossKind::DeathCross, TradeAction::Sell)
    } else {
        return None;
    };

    Some(CrossSignal {
        symbol: symbol.to_string(),
        kind,
        action,
        timestamp: bars[n - 1].time.clone(),
    })
}
