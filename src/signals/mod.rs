// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based trade signals derived from the indicator library:
// - Fast/slow SMA crossover (golden cross / death cross)
// - Multi-symbol screener (trend, volatility band, RSI-based recommendation)

pub mod crossover;
pub mod screener;

pub use crossover::{detect_crossover, CrossSignal};
pub use screener::{screen, ScreenerItem, ScreenerParams, SymbolSeries};
