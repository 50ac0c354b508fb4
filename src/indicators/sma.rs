// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_i = (close_{i-period+1} + ... + close_i) / period
//
// The output is index-aligned with the input: the first `period - 1` slots are
// `None` because the trailing window is not yet full.
// =============================================================================

/// Compute the SMA of `closes` over a trailing window of `period` values.
///
/// The returned vector always has `closes.len()` elements.
///
/// # Edge cases
/// - `period == 0` => every slot is `None`
/// - `closes.len() < period` => every slot is `None`
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return result;
    }

    let period_f = period as f64;
    for (start, window) in closes.windows(period).enumerate() {
        result[start + period - 1] = Some(window.iter().sum::<f64>() / period_f);
    }

    result
}
