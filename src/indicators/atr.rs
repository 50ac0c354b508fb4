// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
// =============================================================================

use crate::types::PriceBar;

/// True Range of `bar` given the previous bar's close.
pub fn true_range(bar: &PriceBar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

/// Compute the most recent ATR value from a slice of bars (oldest first).
///
/// # Returns
/// `None` when:
/// - `period` is zero.
/// - There are fewer than `period + 1` bars (each TR needs a previous close).
/// - Any intermediate value is non-finite.
pub fn calculate_atr(bars: &[PriceBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }
    // f64::max swallows NaN, so a bad print would otherwise slip through TR.
    if bars.iter().any(|b| !(b.high.is_finite() && b.low.is_finite() && b.close.is_finite())) {
        return None;
    }

    let tr_values: Vec<f64> = bars
        .windows(2)
        .map(|w| true_range(&w[1], w[0].close))
        .collect();

    let period_f = period as f64;
    let mut atr = tr_values[..period].iter().sum::<f64>() / period_f;
    if !atr.is_finite() {
        return None;
    }

    for &tr in &tr_values[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            return None;
        }
    }

    Some(atr)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar {
            time: String::new(),
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn atr_period_zero() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 20];
        assert!(calculate_atr(&bars, 0).is_none());
    }

    #[test]
    fn atr_insufficient_data() {
        let bars = vec![bar(100.0, 105.0, 95.0, 102.0); 14];
        assert!(calculate_atr(&bars, 14).is_none());
    }

    #[test]
    fn atr_exact_minimum_data() {
        // TRs: max(5, 3, 2)=5, max(6, 3, 3)=6, max(6, 3, 3)=6 => ATR = 17/3.
        let bars = vec![
            bar(100.0, 102.0, 98.0, 101.0),
            bar(101.0, 104.0, 99.0, 103.0),
            bar(103.0, 106.0, 100.0, 105.0),
            bar(105.0, 108.0, 102.0, 107.0),
        ];
        let atr = calculate_atr(&bars, 3).unwrap();
        assert!((atr - 17.0 / 3.0).abs() < 1e-12, "got {atr}");
    }

    #[test]
    fn atr_constant_range() {
        let bars: Vec<PriceBar> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                bar(base, base + 5.0, base - 5.0, base)
            })
            .collect();
        let atr = calculate_atr(&bars, 14).unwrap();
        assert!((atr - 10.0).abs() < 1.0, "expected ATR near 10.0, got {atr}");
    }

    #[test]
    fn atr_true_range_uses_prev_close() {
        let bars = vec![
            bar(100.0, 105.0, 95.0, 95.0),
            bar(110.0, 115.0, 108.0, 112.0), // gap up: |115-95|=20 > 115-108=7
            bar(112.0, 118.0, 110.0, 115.0),
            bar(115.0, 120.0, 113.0, 118.0),
        ];
        assert_eq!(true_range(&bars[1], bars[0].close), 20.0);
        let atr = calculate_atr(&bars, 3).unwrap();
        assert!(atr > 7.0, "ATR should reflect the gap, got {atr}");
    }

    #[test]
    fn atr_nan_returns_none() {
        let bars = vec![
            bar(100.0, 105.0, 95.0, 100.0),
            bar(100.0, f64::NAN, 95.0, 100.0),
            bar(100.0, 105.0, 95.0, 100.0),
            bar(100.0, 105.0, 95.0, 100.0),
        ];
        assert!(calculate_atr(&bars, 3).is_none());
    }
}
