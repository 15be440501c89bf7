//! Funding endpoints for withdrawals

use kraken_auth::Payload;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::auth::AuthenticatedTransport;
use crate::error::RestResult;
use crate::types::WithdrawResult;

const WITHDRAW_PATH: &str = "/0/private/Withdraw";

/// Funding endpoints
pub struct FundingEndpoints<'a> {
    transport: &'a AuthenticatedTransport,
}

impl<'a> FundingEndpoints<'a> {
    pub fn new(transport: &'a AuthenticatedTransport) -> Self {
        Self { transport }
    }

    /// Withdraw funds
    ///
    /// # Arguments
    /// * `asset` - Asset to withdraw
    /// * `key` - Withdrawal key name (from account settings)
    /// * `amount` - Amount to withdraw
    #[instrument(skip(self))]
    pub async fn withdraw(
        &self,
        asset: &str,
        key: &str,
        amount: Decimal,
    ) -> RestResult<WithdrawResult> {
        let payload = Payload::new()
            .with("asset", asset)
            .with("key", key)
            .with("amount", amount.to_string());

        debug!("Withdrawing {} {}", amount, asset);
        self.transport.call(WITHDRAW_PATH, payload).await
    }
}
