//! Authenticated REST API client for the Kraken cryptocurrency exchange
//!
//! This crate signs and dispatches private requests and turns Kraken's
//! `{error, result}` envelope into typed results or typed errors.
//!
//! # Features
//!
//! - **Account**: Balances, extended balances, paginated trade history
//! - **Trading**: Market orders
//! - **Funding**: Withdrawals to configured keys
//! - **Earn**: Strategies, allocations, allocation status
//!
//! # Authentication
//!
//! Every request is stamped with a strictly increasing nonce and signed with
//! HMAC-SHA512 as described in Kraken's API documentation. Nonce minting and
//! signing happen under one lock so concurrent callers never reuse a nonce.
//!
//! # Example
//!
//! ```no_run
//! use kraken_rest::{Credentials, HistoryWindow, KrakenRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let client = KrakenRestClient::new(creds)?;
//!
//!     let balances = client.balances().await?;
//!     println!("Balances: {:?}", balances.non_zero());
//!
//!     let trades = client.trade_history(HistoryWindow::all()).await?;
//!     println!("{} trades", trades.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! The client does not retry. Trade history walks pause for 7 seconds before
//! each page after the sixth; see [`HistoryThrottle`].

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod error_codes;
pub mod history;
pub mod transport;
pub mod types;

// Re-export main types
pub use auth::{AuthenticatedTransport, Credentials, DEFAULT_BASE_URL};
pub use client::{ClientConfig, KrakenRestClient};
pub use error::{ErrorKind, RestError, RestResult, TransportError};
pub use error_codes::{ErrorCategory, ExchangeError};
pub use history::{HistoryThrottle, HistoryWindow, TradeHistoryFetcher};
pub use kraken_auth::{NonceSequencer, Payload};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MockTransport, RecordedRequest};

// Re-export endpoint-specific types
pub use endpoints::earn::{Allocation, AllocationStatus, EarnStrategy, LockType};
pub use types::{
    // Account
    BalanceInfo, ExtendedBalance, TradeHistoryEntry, TradesHistoryPage,
    // Trading
    OrderResponse, OrderSide,
    // Funding
    WithdrawResult,
    // Responses
    ApiResponse,
};
