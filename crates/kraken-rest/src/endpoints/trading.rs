//! Trading endpoints for order placement
//!
//! These endpoints require authentication.

use kraken_auth::Payload;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::auth::AuthenticatedTransport;
use crate::error::RestResult;
use crate::types::{OrderResponse, OrderSide};

const ADD_ORDER_PATH: &str = "/0/private/AddOrder";

/// Trading endpoints
pub struct TradingEndpoints<'a> {
    transport: &'a AuthenticatedTransport,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(transport: &'a AuthenticatedTransport) -> Self {
        Self { transport }
    }

    /// Place a market order
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g., "XBTUSD")
    /// * `side` - Buy or sell
    /// * `volume` - Order volume in the base asset
    #[instrument(skip(self), fields(side = %side))]
    pub async fn market_order(
        &self,
        pair: &str,
        side: OrderSide,
        volume: Decimal,
    ) -> RestResult<OrderResponse> {
        let payload = Payload::new()
            .with("pair", pair)
            .with("type", side.as_str())
            .with("ordertype", "market")
            .with("volume", volume.to_string());

        let response: OrderResponse = self.transport.call(ADD_ORDER_PATH, payload).await?;
        debug!(txid = ?response.txid, "Order accepted: {}", response.descr.order);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::transport::MockTransport;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_market_order_payload() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(
            r#"{"error": [], "result": {
                "descr": {"order": "sell 1.25000000 XBTUSD @ market"},
                "txid": ["OUF4EM-FRGI2-MQMWZD"]
            }}"#,
        );
        let creds = Credentials::new("test_key", "dGVzdF9wcml2YXRlX2tleQ==").unwrap();
        let transport = AuthenticatedTransport::new(mock.clone(), creds, "https://mock.test");

        let response = TradingEndpoints::new(&transport)
            .market_order("XBTUSD", OrderSide::Sell, dec!(1.25))
            .await
            .unwrap();
        assert_eq!(response.txid, vec!["OUF4EM-FRGI2-MQMWZD".to_string()]);

        let request = &mock.requests()[0];
        assert!(request.url.ends_with("/0/private/AddOrder"));
        assert!(request
            .body
            .starts_with("pair=XBTUSD&type=sell&ordertype=market&volume=1.25&nonce="));
    }
}
