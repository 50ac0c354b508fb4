// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same trailing window the SMA was taken over (divide by `period`).
//
// The middle band is read from the SMA series rather than recomputed, so the
// bands and the plotted moving average always agree.

use serde::{Deserialize, Serialize};

use super::sma::calculate_sma;

/// One point of a Bollinger Band series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands for every index of `closes`.
///
/// The returned vector has `closes.len()` elements; index `i` is `None`
/// while `i < period - 1` and `Some(band)` afterwards. A perfectly flat
/// window gives `upper == middle == lower`.
///
/// `period == 0` yields an all-`None` series.
pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> Vec<Option<BollingerBand>> {
    let sma = calculate_sma(closes, period);
    let period_f = period as f64;

    sma.iter()
        .enumerate()
        .map(|(i, mean)| {
            let middle = (*mean)?;
            let window = &closes[i + 1 - period..=i];
            // The rounded mean of a constant window can sit an ulp away from
            // the closes, which would leave a spurious non-zero σ.
            let std_dev = if window.iter().all(|&x| x == window[0]) {
                0.0
            } else {
                let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
                variance.sqrt()
            };

            Some(BollingerBand {
                upper: middle + std_dev * multiplier,
                middle,
                lower: middle - std_dev * multiplier,
            })
        })
        .collect()
}
