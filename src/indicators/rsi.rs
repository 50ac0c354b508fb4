// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Seed: sum the gains and the absolute losses of the first `period`
//          deltas (close[1]-close[0] .. close[period]-close[period-1]) and
//          divide each by `period`. The seed itself is not emitted.
// Step 2 — For every later bar apply Wilder's smoothing:
//            up move:   avg_gain = (avg_gain * (period - 1) + delta) / period
//                       avg_loss =  avg_loss * (period - 1)          / period
//            otherwise: avg_gain =  avg_gain * (period - 1)          / period
//                       avg_loss = (avg_loss * (period - 1) + |delta|) / period
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first value therefore lands at index `period + 1`, one bar later than
// an SMA of the same period.
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The returned vector is index-aligned with `closes`. Indices `0..=period`
/// are always `None`; later indices carry the smoothed RSI.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `closes.len() < period + 1` => all `None` (the seed cannot complete)
/// - Average loss of zero with a positive average gain => RS is infinite and
///   RSI is exactly 100.0.
/// - Both averages zero (no movement at all) => `0/0`, reported as `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return result;
    }

    // --- Seed averages from the first `period` deltas ------------------------
    let (sum_gain, sum_loss) = closes[..=period]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    // --- Wilder's smoothing, one forward pass --------------------------------
    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            avg_gain = (avg_gain * (period_f - 1.0) + delta) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0)) / period_f;
        } else {
            avg_gain = (avg_gain * (period_f - 1.0)) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) + delta.abs()) / period_f;
        }

        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

/// Overbought / oversold classification of an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    /// `> 70` is overbought, `< 30` is oversold; the thresholds themselves
    /// are neutral.
    pub fn classify(rsi: f64) -> Self {
        if rsi > 70.0 {
            Self::Overbought
        } else if rsi < 30.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "Overbought"),
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Most recent available RSI value, if any.
pub fn latest_rsi(closes: &[f64], period: usize) -> Option<f64> {
    calculate_rsi(closes, period).last().copied().flatten()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value.
///
/// Relies on IEEE-754 division: `x / 0.0` with `x > 0` is `+inf`, which makes
/// `100 / (1 + inf)` collapse to zero and the RSI saturate at 100. A `0 / 0`
/// NaN is the only non-finite outcome and maps to `None`.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    Some(rsi).filter(|v| v.is_finite())
}
