// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators served
// by the dashboard backend. Series functions return one `Option<f64>` per
// input bar so "not enough history yet" is carried in the type instead of a
// NaN; snapshot functions return `Option<T>` for the latest bar.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;

pub use bollinger::calculate_bollinger;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
