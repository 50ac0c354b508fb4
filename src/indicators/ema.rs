// =============================================================================
// Exponential Moving Average (EMA) and MACD
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
//
// MACD line   = EMA(fast) - EMA(slow)
// Signal line = EMA(signal) of the MACD line
// Histogram   = MACD line - Signal line
// =============================================================================

use serde::{Deserialize, Serialize};

/// Compute the EMA series for the given `closes` slice and look-back `period`.
///
/// Returns an empty `Vec` when the input is too short or the period is zero.
/// Each output element corresponds to a close starting at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
/// - A non-finite intermediate value ends the series.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &close in &closes[period..] {
        let ema = close * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// MACD reading for the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the latest MACD / signal / histogram values.
///
/// Returns `None` when:
/// - any period is zero or `fast >= slow`
/// - there are fewer than `slow + signal - 1` closes
/// - either EMA series was cut short by a non-finite value
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdSnapshot> {
    if fast == 0 || signal == 0 || fast >= slow {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if slow_ema.is_empty() || fast_ema.len() != closes.len() - fast + 1 || slow_ema.len() != closes.len() - slow + 1 {
        return None;
    }

    // fast_ema[k] belongs to close index k + fast - 1; align it on slow_ema.
    let offset = slow - fast;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(k, slow_val)| fast_ema[k + offset] - slow_val)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal);
    let macd = *macd_line.last()?;
    let signal = *signal_line.last()?;
    let histogram = macd - signal;

    histogram.is_finite().then_some(MacdSnapshot {
        macd,
        signal,
        histogram,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a simple ascending price series.
    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ---- calculate_ema ---------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_period_equals_length() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..10]: SMA seed 3.0, multiplier 1/3.
        let closes = ascending(10);
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 6);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        let mut expected_vec = vec![expected];
        for &c in &closes[5..] {
            expected = c * mult + expected * (1.0 - mult);
            expected_vec.push(expected);
        }
        for (a, b) in ema.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_handles_nan_in_input() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        assert_eq!(ema.len(), 1);
    }

    // ---- calculate_macd --------------------------------------------------

    #[test]
    fn macd_insufficient_data() {
        // slow 26 + signal 9 - 1 = 34 closes needed.
        assert!(calculate_macd(&ascending(33), 12, 26, 9).is_none());
        assert!(calculate_macd(&ascending(34), 12, 26, 9).is_some());
    }

    #[test]
    fn macd_rejects_bad_periods() {
        let closes = ascending(100);
        assert!(calculate_macd(&closes, 0, 26, 9).is_none());
        assert!(calculate_macd(&closes, 26, 12, 9).is_none());
        assert!(calculate_macd(&closes, 12, 26, 0).is_none());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let m = calculate_macd(&vec![1.25; 60], 12, 26, 9).unwrap();
        assert!(m.macd.abs() < 1e-12);
        assert!(m.signal.abs() < 1e-12);
        assert!(m.histogram.abs() < 1e-12);
    }

    #[test]
    fn macd_uptrend_is_positive() {
        let m = calculate_macd(&ascending(100), 12, 26, 9).unwrap();
        assert!(m.macd > 0.0);
        assert!((m.histogram - (m.macd - m.signal)).abs() < 1e-12);
    }

    #[test]
    fn macd_accelerating_uptrend_has_positive_histogram() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64).powi(2) * 0.01).collect();
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!(m.histogram > 0.0, "histogram {}", m.histogram);
    }
}
