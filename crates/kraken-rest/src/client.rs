//! Main REST client implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kraken_auth::{AuthError, NonceSequencer, Payload};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::{AuthenticatedTransport, Credentials, DEFAULT_BASE_URL};
use crate::endpoints::earn::{Allocation, AllocationStatus, EarnStrategy};
use crate::endpoints::{AccountEndpoints, EarnEndpoints, FundingEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::history::{HistoryThrottle, HistoryWindow, TradeHistoryFetcher};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    BalanceInfo, ExtendedBalance, OrderResponse, OrderSide, TradeHistoryEntry, WithdrawResult,
};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

/// Kraken authenticated REST API client
///
/// # Example
///
/// ```no_run
/// use kraken_rest::{KrakenRestClient, Credentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = KrakenRestClient::new(creds)?;
///     let btc = client.balance("XXBT").await?;
///     println!("XXBT: {btc}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KrakenRestClient {
    transport: Option<AuthenticatedTransport>,
    history_throttle: HistoryThrottle,
}

impl KrakenRestClient {
    /// Create a client with credentials and default settings
    pub fn new(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a client over the default HTTP transport
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let http = ReqwestTransport::new(config.timeout(), user_agent)?;
        Ok(Self::with_transport(config, Arc::new(http)))
    }

    /// Create a client over a caller-supplied HTTP transport
    pub fn with_transport(config: ClientConfig, http: Arc<dyn HttpTransport>) -> Self {
        let nonces = config.nonces.unwrap_or_default();
        let transport = config.credentials.map(|creds| {
            AuthenticatedTransport::with_nonces(http, creds, nonces, &config.base_url)
        });

        info!(
            base_url = %config.base_url,
            authenticated = transport.is_some(),
            "Created Kraken REST client"
        );

        Self {
            transport,
            history_throttle: config.history_throttle,
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.transport.is_some()
    }

    /// Authenticated transport, or a configuration error without credentials
    pub fn private(&self) -> RestResult<&AuthenticatedTransport> {
        self.transport
            .as_ref()
            .ok_or(RestError::Configuration(AuthError::NotConfigured))
    }

    /// Call any private endpoint and decode its `result`
    ///
    /// Use `serde_json::Value` as `T` for the raw result.
    pub async fn private_call<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Payload,
    ) -> RestResult<T> {
        self.private()?.call(path, payload).await
    }

    // ========================================================================
    // Account Endpoints
    // ========================================================================

    /// Get account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        Ok(AccountEndpoints::new(self.private()?))
    }

    /// Get all asset balances
    pub async fn balances(&self) -> RestResult<BalanceInfo> {
        self.account()?.get_balance().await
    }

    /// Get the balance of one asset, zero if absent
    pub async fn balance(&self, asset: &str) -> RestResult<Decimal> {
        self.account()?.balance(asset).await
    }

    /// Get all extended balances
    pub async fn extended_balances(&self) -> RestResult<HashMap<String, ExtendedBalance>> {
        self.account()?.get_extended_balance().await
    }

    /// Get the extended balance of one asset, zero if absent
    pub async fn extended_balance(&self, asset: &str) -> RestResult<Decimal> {
        self.account()?.extended_balance(asset).await
    }

    /// Fetch every trade in `window`, paging and throttling as needed
    pub async fn trade_history(
        &self,
        window: HistoryWindow,
    ) -> RestResult<HashMap<String, TradeHistoryEntry>> {
        TradeHistoryFetcher::new(self.private()?, self.history_throttle)
            .fetch(window)
            .await
    }

    // ========================================================================
    // Trading Endpoints
    // ========================================================================

    /// Get trading endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        Ok(TradingEndpoints::new(self.private()?))
    }

    /// Place a market order
    pub async fn market_order(
        &self,
        pair: &str,
        side: OrderSide,
        volume: Decimal,
    ) -> RestResult<OrderResponse> {
        self.trading()?.market_order(pair, side, volume).await
    }

    // ========================================================================
    // Funding Endpoints
    // ========================================================================

    /// Get funding endpoints (requires credentials)
    pub fn funding(&self) -> RestResult<FundingEndpoints<'_>> {
        Ok(FundingEndpoints::new(self.private()?))
    }

    /// Withdraw to a pre-configured withdrawal key
    pub async fn withdraw(
        &self,
        asset: &str,
        key: &str,
        amount: Decimal,
    ) -> RestResult<WithdrawResult> {
        self.funding()?.withdraw(asset, key, amount).await
    }

    // ========================================================================
    // Earn Endpoints (Staking)
    // ========================================================================

    /// Get earn endpoints (requires credentials)
    pub fn earn(&self) -> RestResult<EarnEndpoints<'_>> {
        Ok(EarnEndpoints::new(self.private()?))
    }

    /// List available staking strategies
    pub async fn list_earn_strategies(&self) -> RestResult<Vec<EarnStrategy>> {
        self.earn()?.list_strategies(None, None).await
    }

    /// List current allocations
    pub async fn list_earn_allocations(&self) -> RestResult<Vec<Allocation>> {
        self.earn()?.list_allocations().await
    }

    /// Allocate funds to a staking strategy
    pub async fn allocate_earn(&self, strategy_id: &str, amount: Decimal) -> RestResult<bool> {
        self.earn()?.allocate(strategy_id, amount).await
    }

    /// Check whether an allocation is still pending
    pub async fn allocate_status(&self, strategy_id: &str) -> RestResult<AllocationStatus> {
        self.earn()?.allocate_status(strategy_id).await
    }
}

impl std::fmt::Debug for KrakenRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenRestClient")
            .field("has_credentials", &self.has_credentials())
            .field("base_url", &self.transport.as_ref().map(|t| t.base_url()))
            .field("history_throttle", &self.history_throttle)
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Pacing for paginated trade history
    pub history_throttle: HistoryThrottle,
    /// Nonce sequence shared with other clients using the same credentials
    pub nonces: Option<Arc<NonceSequencer>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            history_throttle: HistoryThrottle::default(),
            nonces: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set trade history pacing
    pub fn with_history_throttle(mut self, throttle: HistoryThrottle) -> Self {
        self.history_throttle = throttle;
        self
    }

    /// Share a nonce sequence across clients signing with the same key
    pub fn with_nonces(mut self, nonces: Arc<NonceSequencer>) -> Self {
        self.nonces = Some(nonces);
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
