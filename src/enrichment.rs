// =============================================================================
// Indicator Enrichment
// =============================================================================
//
// Runs SMA(fast), SMA(slow), Bollinger(period, k) and RSI(period) once each
// over a price series and zips the results back onto the bars by index.
//
// Output length always equals input length and the OHLCV fields pass through
// untouched. The function holds no state between calls.
// =============================================================================

use tracing::debug;

use crate::indicators::{calculate_bollinger, calculate_rsi, calculate_sma};
use crate::types::{closes, EnrichedBar, PriceBar};

/// Periods and multipliers used by [`enrich_with`].
///
/// The default is the dashboard's fixed set: SMA(20), SMA(50),
/// Bollinger(20, 2) and RSI(14). The `sma20` / `sma50` wire names refer to
/// that set; other values are for offline use only.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    /// Period of the fast moving average (`sma20` field).
    pub sma_fast: usize,
    /// Period of the slow moving average (`sma50` field).
    pub sma_slow: usize,
    pub bollinger_period: usize,
    /// Standard-deviation multiplier for the band width.
    pub bollinger_multiplier: f64,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            rsi_period: 14,
        }
    }
}

/// Enrich `bars` with the fixed dashboard configuration.
pub fn enrich(bars: &[PriceBar]) -> Vec<EnrichedBar> {
    enrich_with(bars, &IndicatorParams::default())
}

/// Enrich `bars` with the indicator periods in `params`.
///
/// Each indicator runs exactly once over the whole series; element `i` of the
/// result is `bars[i]` plus the indicator values at `i`, with `None` wherever
/// an indicator is still warming up. An empty input yields an empty output.
pub fn enrich_with(bars: &[PriceBar], params: &IndicatorParams) -> Vec<EnrichedBar> {
    let closes = closes(bars);

    let sma_fast = calculate_sma(&closes, params.sma_fast);
    let sma_slow = calculate_sma(&closes, params.sma_slow);
    let bands = calculate_bollinger(&closes, params.bollinger_period, params.bollinger_multiplier);
    let rsi = calculate_rsi(&closes, params.rsi_period);

    let enriched: Vec<EnrichedBar> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| EnrichedBar {
            bar: bar.clone(),
            sma20: sma_fast[i],
            sma50: sma_slow[i],
            upper_band: bands[i].map(|b| b.upper),
            lower_band: bands[i].map(|b| b.lower),
            rsi: rsi[i],
        })
        .collect();

    debug!(
        bars = bars.len(),
        first_sma_fast = ?sma_fast.iter().position(Option::is_some),
        first_rsi = ?rsi.iter().position(Option::is_some),
        "series enriched"
    );

    enriched
}
