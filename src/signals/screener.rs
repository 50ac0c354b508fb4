// =============================================================================
// Market Screener — per-symbol trend / volatility / signal classification
// =============================================================================
//
// For each symbol, from its last bar:
//   trend      price vs SMA(slow) with a ±band (default 0.2 %)
//   volatility ATR / price bucketed into LOW / MEDIUM / HIGH
//   signal     RSI combined with trend
//
// Symbols whose indicators are still warming up are skipped.
// =============================================================================

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{atr::calculate_atr, rsi::latest_rsi, calculate_sma};
use crate::types::{closes, PriceBar, ScreenerSignal, Trend, VolatilityBand};

fn default_sma_period() -> usize {
    50
}

fn default_rsi_period() -> usize {
    14
}

fn default_atr_period() -> usize {
    14
}

fn default_max_symbols() -> usize {
    5
}

fn default_trend_band_pct() -> f64 {
    0.2
}

fn default_utc_offset_hours() -> i32 {
    3
}

/// Tunables for [`screen`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerParams {
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_atr_period")]
    pub atr_period: usize,

    /// Symbols beyond this count are ignored.
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,

    /// Half-width of the neutral zone around the SMA, in percent.
    #[serde(default = "default_trend_band_pct")]
    pub trend_band_pct: f64,

    /// Offset applied to item timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for ScreenerParams {
    fn default() -> Self {
        Self {
            sma_period: default_sma_period(),
            rsi_period: default_rsi_period(),
            atr_period: default_atr_period(),
            max_symbols: default_max_symbols(),
            trend_band_pct: default_trend_band_pct(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl ScreenerParams {
    pub fn validate(&self) -> Result<(), String> {
        let counts = [
            ("sma_period", self.sma_period),
            ("rsi_period", self.rsi_period),
            ("atr_period", self.atr_period),
            ("max_symbols", self.max_symbols),
        ];
        if let Some((name, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(format!("{name} must be at least 1"));
        }
        if !self.trend_band_pct.is_finite() || self.trend_band_pct < 0.0 {
            return Err(format!(
                "trend_band_pct must be a finite non-negative number, got {}",
                self.trend_band_pct
            ));
        }
        Ok(())
    }

    /// Fixed offset for timestamps; falls back to UTC if the configured hour
    /// count is out of range.
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// One symbol's price history, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerItem {
    pub symbol: String,
    pub price: f64,
    pub sma: f64,
    pub rsi: f64,
    pub atr: f64,
    pub trend: Trend,
    pub volatility_band: VolatilityBand,
    pub signal: ScreenerSignal,
    pub timestamp: String,
}

/// Price relative to the SMA, with a neutral zone of `band_pct` percent.
pub fn classify_trend(price: f64, sma: f64, band_pct: f64) -> Trend {
    let band = band_pct / 100.0;
    if price > sma * (1.0 + band) {
        Trend::Bullish
    } else if price < sma * (1.0 - band) {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

/// Bucket ATR as a fraction of price.
pub fn classify_volatility(atr: f64, price: f64) -> VolatilityBand {
    let ratio = if price != 0.0 { atr / price } else { 0.0 };
    if ratio > 0.015 {
        VolatilityBand::High
    } else if ratio > 0.007 {
        VolatilityBand::Medium
    } else {
        VolatilityBand::Low
    }
}

/// Combine RSI with trend into a recommendation.
pub fn classify_signal(rsi: f64, trend: Trend) -> ScreenerSignal {
    match trend {
        Trend::Bullish if rsi > 70.0 => ScreenerSignal::StrongBuy,
        Trend::Bullish if rsi > 55.0 => ScreenerSignal::Buy,
        Trend::Bearish if rsi < 30.0 => ScreenerSignal::StrongSell,
        Trend::Bearish if rsi < 45.0 => ScreenerSignal::Sell,
        _ => ScreenerSignal::Neutral,
    }
}

/// Screen a single symbol. `None` when any indicator is unavailable.
pub fn screen_symbol(series: &SymbolSeries, params: &ScreenerParams, now: DateTime<FixedOffset>) -> Option<ScreenerItem> {
    let last = series.bars.last()?;
    let closes = closes(&series.bars);

    let price = last.close;
    let sma = calculate_sma(&closes, params.sma_period).last().copied().flatten()?;
    let rsi = latest_rsi(&closes, params.rsi_period)?;
    let atr = calculate_atr(&series.bars, params.atr_period)?;

    let trend = classify_trend(price, sma, params.trend_band_pct);

    Some(ScreenerItem {
        symbol: series.symbol.clone(),
        price,
        sma,
        rsi,
        atr,
        trend,
        volatility_band: classify_volatility(atr, price),
        signal: classify_signal(rsi, trend),
        timestamp: now.to_rfc3339(),
    })
}

/// Screen up to `params.max_symbols` symbols, in input order.
pub fn screen(series: &[SymbolSeries], params: &ScreenerParams, now: DateTime<FixedOffset>) -> Vec<ScreenerItem> {
    series
        .iter()
        .take(params.max_symbols)
        .filter_map(|s| {
            let item = screen_symbol(s, params, now);
            if item.is_none() {
                debug!(symbol = %s.symbol, bars = s.bars.len(), "screener skipped symbol: insufficient history");
            }
            item
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .unwrap()
    }

    fn series(symbol: &str, closes: impl IntoIterator<Item = f64>) -> SymbolSeries {
        SymbolSeries {
            symbol: symbol.to_string(),
            bars: closes
                .into_iter()
                .enumerate()
                .map(|(i, c)| PriceBar {
                    time: format!("d{i}"),
                    open: c,
                    high: c * 1.002,
                    low: c * 0.998,
                    close: c,
                    volume: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn trend_band_is_exclusive() {
        assert_eq!(classify_trend(1.0030, 1.0, 0.2), Trend::Bullish);
        assert_eq!(classify_trend(1.0010, 1.0, 0.2), Trend::Neutral);
        assert_eq!(classify_trend(0.9990, 1.0, 0.2), Trend::Neutral);
        assert_eq!(classify_trend(0.9970, 1.0, 0.2), Trend::Bearish);
    }

    #[test]
    fn volatility_buckets() {
        assert_eq!(classify_volatility(0.02, 1.0), VolatilityBand::High);
        assert_eq!(classify_volatility(0.01, 1.0), VolatilityBand::Medium);
        assert_eq!(classify_volatility(0.007, 1.0), VolatilityBand::Low);
        assert_eq!(classify_volatility(0.5, 0.0), VolatilityBand::Low);
    }

    #[test]
    fn signal_table() {
        assert_eq!(classify_signal(75.0, Trend::Bullish), ScreenerSignal::StrongBuy);
        assert_eq!(classify_signal(60.0, Trend::Bullish), ScreenerSignal::Buy);
        assert_eq!(classify_signal(50.0, Trend::Bullish), ScreenerSignal::Neutral);
        assert_eq!(classify_signal(25.0, Trend::Bearish), ScreenerSignal::StrongSell);
        assert_eq!(classify_signal(40.0, Trend::Bearish), ScreenerSignal::Sell);
        assert_eq!(classify_signal(80.0, Trend::Neutral), ScreenerSignal::Neutral);
        assert_eq!(classify_signal(10.0, Trend::Bullish), ScreenerSignal::Neutral);
    }

    #[test]
    fn rising_symbol_is_bullish_strong_buy() {
        let s = series("EUR/USD", (0..80).map(|i| 1.05 + i as f64 * 0.002));
        let item = screen_symbol(&s, &ScreenerParams::default(), now()).unwrap();
        assert_eq!(item.trend, Trend::Bullish);
        assert_eq!(item.rsi, 100.0);
        assert_eq!(item.signal, ScreenerSignal::StrongBuy);
        assert_eq!(item.timestamp, "2024-05-01T12:00:00+03:00");
        assert!((item.price - (1.05 + 79.0 * 0.002)).abs() < 1e-12);
    }

    #[test]
    fn falling_symbol_is_bearish_strong_sell() {
        let s = series("GBP/USD", (0..80).map(|i| 1.30 - i as f64 * 0.002));
        let item = screen_symbol(&s, &ScreenerParams::default(), now()).unwrap();
        assert_eq!(item.trend, Trend::Bearish);
        assert_eq!(item.signal, ScreenerSignal::StrongSell);
    }

    #[test]
    fn short_history_is_skipped() {
        let params = ScreenerParams::default();
        let batch = vec![
            series("EUR/USD", (0..80).map(|i| 1.05 + i as f64 * 0.002)),
            series("USD/JPY", (0..10).map(|i| 150.0 + i as f64)),
        ];
        let items = screen(&batch, &params, now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].symbol, "EUR/USD");
    }

    #[test]
    fn max_symbols_caps_batch() {
        let params = ScreenerParams {
            max_symbols: 2,
            ..ScreenerParams::default()
        };
        let batch: Vec<SymbolSeries> = ["A/B", "C/D", "E/F"]
            .iter()
            .map(|s| series(s, (0..80).map(|i| 1.0 + i as f64 * 0.001)))
            .collect();
        let items = screen(&batch, &params, now());
        assert_eq!(items.iter().map(|i| i.symbol.as_str()).collect::<Vec<_>>(), ["A/B", "C/D"]);
    }

    #[test]
    fn params_validation() {
        assert!(ScreenerParams::default().validate().is_ok());
        let no_symbols = ScreenerParams {
            max_symbols: 0,
            ..ScreenerParams::default()
        };
        assert_eq!(no_symbols.validate().unwrap_err(), "max_symbols must be at least 1");
        let bad_band = ScreenerParams {
            trend_band_pct: f64::NAN,
            ..ScreenerParams::default()
        };
        assert!(bad_band.validate().is_err());
    }

    #[test]
    fn offset_falls_back_to_utc() {
        let params = ScreenerParams {
            utc_offset_hours: 48,
            ..ScreenerParams::default()
        };
        assert_eq!(params.offset().local_minus_utc(), 0);
        assert_eq!(ScreenerParams::default().offset().local_minus_utc(), 3 * 3600);
    }
}
