//! Private account endpoints
//!
//! These endpoints require authentication.

use kraken_auth::Payload;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::instrument;

use crate::auth::AuthenticatedTransport;
use crate::error::RestResult;
use crate::history::{HistoryWindow, TRADES_HISTORY_PATH};
use crate::types::{BalanceInfo, ExtendedBalance, TradesHistoryPage};

const BALANCE_PATH: &str = "/0/private/Balance";
const BALANCE_EX_PATH: &str = "/0/private/BalanceEx";

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    transport: &'a AuthenticatedTransport,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(transport: &'a AuthenticatedTransport) -> Self {
        Self { transport }
    }

    /// Get all asset balances
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> RestResult<BalanceInfo> {
        self.transport.call(BALANCE_PATH, Payload::new()).await
    }

    /// Get the balance of one asset
    ///
    /// An asset missing from the response has a zero balance.
    #[instrument(skip(self))]
    pub async fn balance(&self, asset: &str) -> RestResult<Decimal> {
        let balances = self.get_balance().await?;
        Ok(balances.get(asset).unwrap_or(Decimal::ZERO))
    }

    /// Get extended balances with credit and hold amounts
    #[instrument(skip(self))]
    pub async fn get_extended_balance(&self) -> RestResult<HashMap<String, ExtendedBalance>> {
        self.transport.call(BALANCE_EX_PATH, Payload::new()).await
    }

    /// Get the extended balance of one asset
    ///
    /// Returns the total `balance` field; zero if the asset is missing.
    #[instrument(skip(self))]
    pub async fn extended_balance(&self, asset: &str) -> RestResult<Decimal> {
        let balances = self.get_extended_balance().await?;
        Ok(balances
            .get(asset)
            .and_then(ExtendedBalance::total)
            .unwrap_or(Decimal::ZERO))
    }

    /// Get one page of trade history
    ///
    /// # Arguments
    /// * `window` - Optional start/end bounds
    /// * `ofs` - Result offset (a multiple of the page size)
    #[instrument(skip(self))]
    pub async fn get_trades_history(
        &self,
        window: &HistoryWindow,
        ofs: u64,
    ) -> RestResult<TradesHistoryPage> {
        self.transport
            .call(TRADES_HISTORY_PATH, window.payload(ofs))
            .await
    }
}
