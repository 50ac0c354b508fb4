// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// Interpretation:
//   ADX > 25  => trending market
// =============================================================================

use super::atr::true_range;
use crate::types::PriceBar;

/// Compute the most recent ADX value from a slice of bars.
///
/// Returns `None` when:
/// - `period` is zero.
/// - There are fewer than `2 * period + 1` bars (`period` transitions for
///   the initial smoothing, another `period` DX values to seed the ADX, plus
///   the first bar which has no predecessor).
/// - Any intermediate calculation produces a non-finite result, including a
///   window with zero true range.
pub fn calculate_adx(bars: &[PriceBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < 2 * period + 1 {
        return None;
    }

    let period_f = period as f64;
    let transitions = bars.len() - 1;

    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut tr_vals = Vec::with_capacity(transitions);

    for w in bars.windows(2) {
        let (prev, cur) = (&w[0], &w[1]);

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
        tr_vals.push(true_range(cur, prev.close));
    }

    // Wilder's running sums, seeded with the first `period` transitions.
    let mut smooth_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    let mut dx_values: Vec<f64> = Vec::with_capacity(transitions - period + 1);
    dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);

    for i in period..transitions {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];

        dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);
    }

    if dx_values.len() < period {
        return None;
    }

    let mut adx = dx_values[..period].iter().sum::<f64>() / period_f;
    for &dx in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
    }

    adx.is_finite().then_some(adx)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
///
/// Returns `None` if the divisor is zero or the result is non-finite.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // No directional movement.
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some(dx)
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
            volume: 1.0,
        }
    }

    #[test]
    fn adx_period_zero() {
        let bars = vec![bar(1.0, 2.0, 0.5, 1.5); 50];
        assert!(calculate_adx(&bars, 0).is_none());
    }

    #[test]
    fn adx_insufficient_data() {
        let bars = vec![bar(1.0, 2.0, 0.5, 1.5); 10];
        assert!(calculate_adx(&bars, 14).is_none());
    }

    #[test]
    fn adx_strong_uptrend() {
        let bars: Vec<PriceBar> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                bar(base, base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();

        let value = calculate_adx(&bars, 14).unwrap();
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_flat_market() {
        let bars = vec![bar(100.0, 101.0, 99.0, 100.0); 60];
        let value = calculate_adx(&bars, 14).unwrap();
        assert!(value < 1.0, "expected ADX near 0 for flat market, got {value}");
    }

    #[test]
    fn adx_zero_range_is_none() {
        let bars = vec![bar(1.0, 1.0, 1.0, 1.0); 40];
        assert!(calculate_adx(&bars, 14).is_none());
    }

    #[test]
    fn adx_result_range() {
        let bars: Vec<PriceBar> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                bar(base - 0.5, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let value = calculate_adx(&bars, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "ADX {value} out of [0,100] range");
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let min = 2 * period + 1;
        let bars: Vec<PriceBar> = (0..min)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(base, base + 1.0, base - 0.5, base + 0.5)
            })
            .collect();
        assert!(calculate_adx(&bars, period).is_some());
        assert!(calculate_adx(&bars[..min - 1], period).is_none());
    }
}
