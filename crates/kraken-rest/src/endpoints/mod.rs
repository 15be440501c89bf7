//! API endpoint implementations
//!
//! Each group borrows the client's [`AuthenticatedTransport`](crate::auth::AuthenticatedTransport)
//! and maps one method onto one private endpoint.

pub mod account;
pub mod earn;
pub mod funding;
pub mod trading;

pub use account::AccountEndpoints;
pub use earn::EarnEndpoints;
pub use funding::FundingEndpoints;
pub use trading::TradingEndpoints;
