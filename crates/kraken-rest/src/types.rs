//! Types for Kraken REST API requests and responses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RestError, RestResult};

// ============================================================================
// API Response Wrapper
// ============================================================================

/// Standard Kraken API response wrapper
///
/// A well-formed response has either a non-empty `error` array or a
/// `result`. Missing fields default to empty, so `{}` parses and is then
/// rejected by [`ApiResponse::into_result`].
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    /// Error messages (empty if successful)
    #[serde(default)]
    pub error: Vec<String>,
    /// Result data (present if successful)
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        self.error.is_empty() && self.result.is_some()
    }

    /// Get the result, classifying a failed envelope
    ///
    /// A non-empty `error` wins over any `result`; an envelope with neither
    /// is a protocol error.
    pub fn into_result(self) -> RestResult<T> {
        if !self.error.is_empty() {
            return Err(RestError::from_api_errors(self.error));
        }
        self.result.ok_or_else(|| {
            RestError::Protocol("response carried neither an error nor a result".to_string())
        })
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Account balance information, keyed by asset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceInfo(pub HashMap<String, String>);

impl BalanceInfo {
    /// Get balance for a specific asset
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.0.get(asset).and_then(|s| s.parse().ok())
    }

    /// Get all non-zero balances
    pub fn non_zero(&self) -> HashMap<String, Decimal> {
        self.iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(asset, balance)| (asset.clone(), balance))
            .collect()
    }

    /// Iterate over all balances
    pub fn iter(&self) -> impl Iterator<Item = (&String, Decimal)> {
        self.0.iter().filter_map(|(k, v)| {
            let balance: Decimal = v.parse().ok()?;
            Some((k, balance))
        })
    }
}

/// Extended balance with credit and hold amounts
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedBalance {
    /// Total balance
    pub balance: String,
    /// Credit line
    #[serde(default)]
    pub credit: Option<String>,
    /// Credit in use
    #[serde(default)]
    pub credit_used: Option<String>,
    /// Amount on hold for open orders
    #[serde(default)]
    pub hold_trade: Option<String>,
}

impl ExtendedBalance {
    /// Total balance as a decimal
    pub fn total(&self) -> Option<Decimal> {
        self.balance.parse().ok()
    }

    /// Balance not held by open orders
    pub fn available(&self) -> Option<Decimal> {
        let hold = match &self.hold_trade {
            Some(hold) => hold.parse().ok()?,
            None => Decimal::ZERO,
        };
        Some(self.total()? - hold)
    }
}

/// Trade history entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeHistoryEntry {
    /// Order transaction ID
    pub ordertxid: String,
    /// Position transaction ID
    #[serde(default)]
    pub postxid: Option<String>,
    /// Pair
    pub pair: String,
    /// Time of trade
    pub time: f64,
    /// Type (buy/sell)
    #[serde(rename = "type")]
    pub side: String,
    /// Order type (market/limit)
    pub ordertype: String,
    /// Price
    pub price: String,
    /// Cost
    pub cost: String,
    /// Fee
    pub fee: String,
    /// Volume
    pub vol: String,
    /// Margin
    #[serde(default)]
    pub margin: Option<String>,
    /// Miscellaneous
    #[serde(default)]
    pub misc: String,
    /// Sequential trade ID
    #[serde(default)]
    pub trade_id: Option<u64>,
    /// Whether the trade was a maker fill
    #[serde(default)]
    pub maker: Option<bool>,
}

impl TradeHistoryEntry {
    /// Executed volume as a decimal
    pub fn volume(&self) -> Option<Decimal> {
        self.vol.parse().ok()
    }

    /// Execution price as a decimal
    pub fn price(&self) -> Option<Decimal> {
        self.price.parse().ok()
    }
}

/// One page of `/0/private/TradesHistory`
#[derive(Debug, Clone, Deserialize)]
pub struct TradesHistoryPage {
    /// Trades keyed by trade ID
    pub trades: HashMap<String, TradeHistoryEntry>,
    /// Total number of trades matching the query
    pub count: u64,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Get the API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(format!("unknown order side: {}", other)),
        }
    }
}

/// Response from placing an order
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// Order description
    pub descr: OrderResponseDescription,
    /// Transaction IDs (absent when only validating)
    #[serde(default)]
    pub txid: Vec<String>,
}

/// Order response description
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponseDescription {
    /// Order description
    pub order: String,
    /// Close order description (if applicable)
    #[serde(default)]
    pub close: Option<String>,
}

// ============================================================================
// Funding Types
// ============================================================================

/// Result of a withdrawal request
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawResult {
    /// Reference ID of the withdrawal
    pub refid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_with_result() {
        let response: ApiResponse<BalanceInfo> =
            serde_json::from_str(r#"{"error": [], "result": {"ZUSD": "100.0"}}"#).unwrap();
        assert!(response.is_success());

        let balances = response.into_result().unwrap();
        assert_eq!(balances.get("ZUSD"), Some(dec!(100.0)));
    }

    #[test]
    fn test_envelope_with_error_and_no_result() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"error": ["EOrder:Insufficient funds"]}"#).unwrap();
        assert!(!response.is_success());

        let err = response.into_result().unwrap_err();
        match err {
            RestError::Exchange { errors, .. } => {
                assert_eq!(errors, vec!["EOrder:Insufficient funds".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_null_result_is_protocol_error() {
        let response: ApiResponse = serde_json::from_str(r#"{"error": [], "result": null}"#).unwrap();
        assert!(matches!(response.into_result(), Err(RestError::Protocol(_))));
    }

    #[test]
    fn test_empty_envelope_is_protocol_error() {
        let response: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(response.into_result(), Err(RestError::Protocol(_))));
    }

    #[test]
    fn test_balance_helpers() {
        let mut map = HashMap::new();
        map.insert("XXBT".to_string(), "0.5000000000".to_string());
        map.insert("ZUSD".to_string(), "0.0000".to_string());
        let balances = BalanceInfo(map);

        assert_eq!(balances.get("XXBT"), Some(dec!(0.5)));
        assert_eq!(balances.get("XETH"), None);

        let non_zero = balances.non_zero();
        assert_eq!(non_zero.len(), 1);
        assert!(non_zero.contains_key("XXBT"));
    }

    #[test]
    fn test_extended_balance_available() {
        let balance: ExtendedBalance =
            serde_json::from_str(r#"{"balance": "10.5", "hold_trade": "2.5"}"#).unwrap();
        assert_eq!(balance.total(), Some(dec!(10.5)));
        assert_eq!(balance.available(), Some(dec!(8.0)));

        let no_hold: ExtendedBalance = serde_json::from_str(r#"{"balance": "3"}"#).unwrap();
        assert_eq!(no_hold.available(), Some(dec!(3)));
    }

    #[test]
    fn test_order_side() {
        assert_eq!(OrderSide::Buy.to_string(), "buy");
        assert_eq!("SELL".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn test_order_response_parsing() {
        let response: OrderResponse = serde_json::from_str(
            r#"{"descr": {"order": "buy 1.25000000 XBTUSD @ market"}, "txid": ["OUF4EM-FRGI2-MQMWZD"]}"#,
        )
        .unwrap();
        assert_eq!(response.txid, vec!["OUF4EM-FRGI2-MQMWZD".to_string()]);
        assert!(response.descr.close.is_none());
    }
}
