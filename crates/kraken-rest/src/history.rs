//! Paginated trade history retrieval
//!
//! `/0/private/TradesHistory` returns at most [`PAGE_SIZE`] trades per call
//! together with the total `count` matching the query. The fetcher walks
//! pages sequentially, merging each page into one map keyed by trade id,
//! until the offset reaches the reported total.
//!
//! Large histories hit the private call-rate counter, so after
//! `free_pages` pages every further request is preceded by a fixed delay.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use kraken_auth::Payload;
use tracing::{debug, info, instrument};

use crate::auth::AuthenticatedTransport;
use crate::endpoints::AccountEndpoints;
use crate::error::RestResult;
use crate::types::TradeHistoryEntry;

/// Trade history endpoint
pub const TRADES_HISTORY_PATH: &str = "/0/private/TradesHistory";

/// Trades returned per page
pub const PAGE_SIZE: u64 = 50;

/// Pages fetched back-to-back before throttling starts
pub const DEFAULT_FREE_PAGES: u32 = 6;

/// Delay inserted before each throttled page
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(7);

/// Pacing applied to long history walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryThrottle {
    /// Pages that may be fetched without delay
    pub free_pages: u32,
    /// Sleep before each page once `free_pages` is exceeded
    pub delay: Duration,
}

impl HistoryThrottle {
    /// No pacing at all
    pub fn disabled() -> Self {
        Self {
            free_pages: u32::MAX,
            delay: Duration::ZERO,
        }
    }

    /// Whether a delay is due before the next request
    fn applies(&self, pages_fetched: u32) -> bool {
        pages_fetched > self.free_pages && !self.delay.is_zero()
    }
}

impl Default for HistoryThrottle {
    fn default() -> Self {
        Self {
            free_pages: DEFAULT_FREE_PAGES,
            delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Optional time bounds for a history query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Lower bound, exclusive
    pub start: Option<DateTime<Utc>>,
    /// Upper bound, inclusive
    pub end: Option<DateTime<Utc>>,
}

impl HistoryWindow {
    /// Unbounded window
    pub fn all() -> Self {
        Self::default()
    }

    /// Window between two instants
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Window from `start` until now
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// Request payload for the page at `ofs`
    pub fn payload(&self, ofs: u64) -> Payload {
        Payload::new()
            .with("ofs", ofs)
            .with_opt("start", self.start.map(|t| t.timestamp()))
            .with_opt("end", self.end.map(|t| t.timestamp()))
    }
}

/// Offset cursor over the server-reported total
#[derive(Debug, Clone, Copy)]
struct PageCursor {
    page: u64,
    total: u64,
}

impl PageCursor {
    /// Start assuming one full page exists; the first response corrects it
    fn new() -> Self {
        Self {
            page: 0,
            total: PAGE_SIZE,
        }
    }

    fn offset(&self) -> u64 {
        self.page * PAGE_SIZE
    }

    fn is_done(&self) -> bool {
        self.offset() >= self.total
    }

    fn advance(&mut self, total: u64) {
        self.total = total;
        self.page += 1;
    }
}

/// Walks every page of trade history for one window
pub struct TradeHistoryFetcher<'a> {
    transport: &'a AuthenticatedTransport,
    throttle: HistoryThrottle,
}

impl<'a> TradeHistoryFetcher<'a> {
    /// Create a fetcher over `transport` paced by `throttle`
    pub fn new(transport: &'a AuthenticatedTransport, throttle: HistoryThrottle) -> Self {
        Self {
            transport,
            throttle,
        }
    }

    /// Fetch all trades in `window`
    ///
    /// Pages are requested one at a time. A trade id already seen keeps its
    /// first record. Any failed page aborts the walk and its error is
    /// returned; trades merged so far are discarded.
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        window: HistoryWindow,
    ) -> RestResult<HashMap<String, TradeHistoryEntry>> {
        let account = AccountEndpoints::new(self.transport);
        let mut trades = HashMap::new();
        let mut cursor = PageCursor::new();
        let mut pages_fetched: u32 = 0;

        while !cursor.is_done() {
            if self.throttle.applies(pages_fetched) {
                info!(
                    page = cursor.page,
                    delay_ms = self.throttle.delay.as_millis() as u64,
                    "Throttling trade history"
                );
                tokio::time::sleep(self.throttle.delay).await;
            }

            let page = account
                .get_trades_history(&window, cursor.offset())
                .await?;
            pages_fetched = pages_fetched.saturating_add(1);

            let received = page.trades.len();
            for (id, trade) in page.trades {
                trades.entry(id).or_insert(trade);
            }

            debug!(
                page = cursor.page,
                received,
                count = page.count,
                merged = trades.len(),
                "Fetched trade history page"
            );
            cursor.advance(page.count);
        }

        Ok(trades)
    }
}
