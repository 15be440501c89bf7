//! Earn endpoints for staking and yield generation
//!
//! These endpoints require authentication and allow users to:
//! - View available staking strategies
//! - Allocate funds to a strategy
//! - Track pending allocations

use kraken_auth::Payload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::auth::AuthenticatedTransport;
use crate::error::RestResult;

const STRATEGIES_PATH: &str = "/0/private/Earn/Strategies";
const ALLOCATE_PATH: &str = "/0/private/Earn/Allocate";
const ALLOCATE_STATUS_PATH: &str = "/0/private/Earn/AllocateStatus";
const ALLOCATIONS_PATH: &str = "/0/private/Earn/Allocations";

/// Earn endpoints for staking operations
pub struct EarnEndpoints<'a> {
    transport: &'a AuthenticatedTransport,
}

impl<'a> EarnEndpoints<'a> {
    pub fn new(transport: &'a AuthenticatedTransport) -> Self {
        Self { transport }
    }

    /// List available earn strategies
    ///
    /// # Arguments
    /// * `asset` - Filter by asset (optional, e.g., "ETH", "DOT")
    /// * `lock_type` - Filter by lock type (optional)
    #[instrument(skip(self))]
    pub async fn list_strategies(
        &self,
        asset: Option<&str>,
        lock_type: Option<LockType>,
    ) -> RestResult<Vec<EarnStrategy>> {
        let payload = Payload::new()
            .with_opt("asset", asset)
            .with_opt("lock_type", lock_type.map(|l| l.as_str()));

        let response: ItemList<EarnStrategy> =
            self.transport.call(STRATEGIES_PATH, payload).await?;
        debug!("Listed {} earn strategies", response.items.len());
        Ok(response.items)
    }

    /// List current allocations
    #[instrument(skip(self))]
    pub async fn list_allocations(&self) -> RestResult<Vec<Allocation>> {
        let response: ItemList<Allocation> =
            self.transport.call(ALLOCATIONS_PATH, Payload::new()).await?;
        debug!("Listed {} allocations", response.items.len());
        Ok(response.items)
    }

    /// Allocate funds to an earn strategy
    ///
    /// Returns the exchange's acknowledgement; the allocation itself completes
    /// asynchronously, see [`allocate_status`](Self::allocate_status).
    #[instrument(skip(self))]
    pub async fn allocate(&self, strategy_id: &str, amount: Decimal) -> RestResult<bool> {
        let payload = Payload::new()
            .with("strategy_id", strategy_id)
            .with("amount", amount.to_string());

        debug!("Allocating {} to strategy {}", amount, strategy_id);
        self.transport.call(ALLOCATE_PATH, payload).await
    }

    /// Get allocation status for a strategy
    #[instrument(skip(self))]
    pub async fn allocate_status(&self, strategy_id: &str) -> RestResult<AllocationStatus> {
        let payload = Payload::new().with("strategy_id", strategy_id);
        self.transport.call(ALLOCATE_STATUS_PATH, payload).await
    }
}

/// Paged list wrapper used by the earn listings
#[derive(Debug, Clone, Deserialize)]
struct ItemList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Lock type for staking strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockType {
    /// Flexible staking - can unstake anytime
    Flex,
    /// Bonded staking - locked for a period
    Bonded,
    /// Timed staking - fixed duration
    Timed,
    /// Instant unstaking available
    Instant,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Flex => "flex",
            LockType::Bonded => "bonded",
            LockType::Timed => "timed",
            LockType::Instant => "instant",
        }
    }
}

/// Lock type descriptor attached to a strategy
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyLock {
    #[serde(rename = "type")]
    pub lock_type: LockType,
    /// Unbonding period in seconds
    #[serde(default)]
    pub unbonding_period: Option<u64>,
}

/// APR estimate
#[derive(Debug, Clone, Deserialize)]
pub struct AprEstimate {
    pub low: String,
    pub high: String,
}

/// Earn strategy
#[derive(Debug, Clone, Deserialize)]
pub struct EarnStrategy {
    /// Unique strategy ID
    pub id: String,
    /// Asset to stake
    pub asset: String,
    #[serde(default)]
    pub lock_type: Option<StrategyLock>,
    #[serde(default)]
    pub apr_estimate: Option<AprEstimate>,
    #[serde(default)]
    pub can_allocate: bool,
    #[serde(default)]
    pub can_deallocate: bool,
    #[serde(default)]
    pub allocation_fee: Option<String>,
    #[serde(default)]
    pub deallocation_fee: Option<String>,
    /// Minimum allocation amount
    #[serde(default)]
    pub user_min_allocation: Option<String>,
    /// Per-user cap
    #[serde(default)]
    pub user_cap: Option<String>,
    #[serde(default)]
    pub allocation_restriction_info: Vec<String>,
}

/// Amount information
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmountInfo {
    #[serde(default)]
    pub native: Option<String>,
    #[serde(default)]
    pub converted: Option<String>,
}

impl AmountInfo {
    /// Native amount as a decimal
    pub fn native(&self) -> Option<Decimal> {
        self.native.as_deref()?.parse().ok()
    }
}

/// Allocated amount breakdown
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllocatedAmount {
    /// Total allocated
    #[serde(default)]
    pub total: AmountInfo,
}

/// Allocation entry
#[derive(Debug, Clone, Deserialize)]
pub struct Allocation {
    /// Strategy ID
    pub strategy_id: String,
    /// Native asset
    pub native_asset: String,
    #[serde(default)]
    pub amount_allocated: AllocatedAmount,
    #[serde(default)]
    pub total_rewarded: Option<AmountInfo>,
}

impl Allocation {
    /// Total allocated amount in the native asset, if reported
    pub fn total_native(&self) -> Option<Decimal> {
        self.amount_allocated.total.native()
    }
}

/// Allocation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AllocationStatus {
    /// Whether an allocation is still in progress
    pub pending: bool,
}
