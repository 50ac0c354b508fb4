// =============================================================================
// Position Sizing — lot size from account risk and stop distance
// =============================================================================
//
//   risk_amount        = balance * risk_percent / 100
//   pip_size           = 0.01 for JPY pairs, 0.0001 otherwise
//   pip_value_per_lot  = STANDARD_LOT_UNITS * pip_size * quote->account rate
//   suggested_lots     = risk_amount / (stop_loss_pips * pip_value_per_lot)
//
// All outputs are rounded to two decimals.
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Units of base currency in one standard lot.
pub const STANDARD_LOT_UNITS: f64 = 100_000.0;

fn default_pair() -> String {
    "EUR/USD".to_string()
}

fn default_account_currency() -> String {
    "USD".to_string()
}

/// Inputs for a position-size calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRequest {
    pub account_balance: f64,
    pub risk_percent: f64,
    pub stop_loss_pips: f64,
    #[serde(default = "default_pair")]
    pub pair: String,
    #[serde(default = "default_account_currency")]
    pub account_currency: String,
    /// Price of one unit of the pair's quote currency in the account
    /// currency. Only needed when they differ.
    #[serde(default)]
    pub quote_to_account_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResponse {
    pub risk_amount: f64,
    pub suggested_lots: f64,
    pub pip_value_per_lot: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum RiskError {
    #[error("pair must look like BASE/QUOTE, got '{0}'")]
    MalformedPair(String),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("stop_loss_pips must be positive, got {0}")]
    NonPositiveStopLoss(f64),
    #[error("quote_to_account_rate is required to convert {quote} into {account}")]
    MissingConversionRate { quote: String, account: String },
    #[error("quote_to_account_rate must be positive, got {0}")]
    NonPositiveRate(f64),
}

/// Pip size for `pair`: JPY crosses quote to two decimals, everything else to
/// four.
pub fn pip_size(pair: &str) -> f64 {
    if pair.to_uppercase().contains("JPY") {
        0.01
    } else {
        0.0001
    }
}

/// Compute risk amount, pip value and suggested lot size.
pub fn calculate_position_size(req: &RiskRequest) -> Result<RiskResponse, RiskError> {
    for (field, value) in [
        ("account_balance", req.account_balance),
        ("risk_percent", req.risk_percent),
        ("stop_loss_pips", req.stop_loss_pips),
    ] {
        if !value.is_finite() {
            return Err(RiskError::NonFinite { field });
        }
    }
    if req.stop_loss_pips <= 0.0 {
        return Err(RiskError::NonPositiveStopLoss(req.stop_loss_pips));
    }

    let quote = match req.pair.split('/').collect::<Vec<_>>().as_slice() {
        [base, quote] if !base.trim().is_empty() && !quote.trim().is_empty() => quote.trim().to_uppercase(),
        _ => return Err(RiskError::MalformedPair(req.pair.clone())),
    };
    let account = req.account_currency.trim().to_uppercase();

    let rate = if quote == account {
        1.0
    } else {
        match req.quote_to_account_rate {
            None => return Err(RiskError::MissingConversionRate { quote, account }),
            Some(r) if !r.is_finite() => {
                return Err(RiskError::NonFinite {
                    field: "quote_to_account_rate",
                })
            }
            Some(r) if r <= 0.0 => return Err(RiskError::NonPositiveRate(r)),
            Some(r) => r,
        }
    };

    let risk_amount = req.account_balance * (req.risk_percent / 100.0);
    let pip_value_per_lot = STANDARD_LOT_UNITS * pip_size(&req.pair) * rate;
    let suggested_lots = risk_amount / (req.stop_loss_pips * pip_value_per_lot);

    Ok(RiskResponse {
        risk_amount: round2(risk_amount),
        suggested_lots: round2(suggested_lots),
        pip_value_per_lot: round2(pip_value_per_lot),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn request(pair: &str, account: &str) -> RiskRequest {
        RiskRequest {
            account_balance: 10_000.0,
            risk_percent: 1.0,
            stop_loss_pips: 20.0,
            pair: pair.to_string(),
            account_currency: account.to_string(),
            quote_to_account_rate: None,
        }
    }

    #[test]
    fn usd_quoted_pair_in_usd_account() {
        let resp = calculate_position_size(&request("EUR/USD", "USD")).unwrap();
        assert_eq!(resp.risk_amount, 100.0);
        assert_eq!(resp.pip_value_per_lot, 10.0);
        assert_eq!(resp.suggested_lots, 0.5);
    }

    #[test]
    fn jpy_pair_uses_two_decimal_pips() {
        let mut req = request("USD/JPY", "USD");
        req.quote_to_account_rate = Some(0.0067);
        let resp = calculate_position_size(&req).unwrap();
        // 100_000 * 0.01 * 0.0067 = 6.7 USD per pip per lot.
        assert_eq!(resp.pip_value_per_lot, 6.7);
        assert_eq!(resp.suggested_lots, 0.75);
    }

    #[test]
    fn currency_match_is_case_insensitive() {
        let resp = calculate_position_size(&request("gbp/usd", "usd")).unwrap();
        assert_eq!(resp.pip_value_per_lot, 10.0);
    }

    #[test]
    fn cross_pair_requires_rate() {
        let err = calculate_position_size(&request("EUR/GBP", "USD")).unwrap_err();
        assert_eq!(
            err,
            RiskError::MissingConversionRate {
                quote: "GBP".into(),
                account: "USD".into()
            }
        );
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut req = request("EURUSD", "USD");
        assert!(matches!(calculate_position_size(&req), Err(RiskError::MalformedPair(_))));

        req = request("EUR/USD", "USD");
        req.stop_loss_pips = 0.0;
        assert_eq!(calculate_position_size(&req), Err(RiskError::NonPositiveStopLoss(0.0)));

        req = request("EUR/GBP", "USD");
        req.quote_to_account_rate = Some(-1.0);
        assert_eq!(calculate_position_size(&req), Err(RiskError::NonPositiveRate(-1.0)));

        req = request("EUR/USD", "USD");
        req.account_balance = f64::INFINITY;
        assert_eq!(
            calculate_position_size(&req),
            Err(RiskError::NonFinite { field: "account_balance" })
        );
    }

    #[test]
    fn error_messages_are_readable() {
        let msg = RiskError::MalformedPair("EURUSD".into()).to_string();
        assert_eq!(msg, "pair must look like BASE/QUOTE, got 'EURUSD'");
    }
}
