//! Nonce sequencing for private requests
//!
//! Kraken rejects any private request whose nonce is not strictly greater
//! than the last one it accepted for the same API key. A raw timestamp is
//! not enough: two requests minted within one clock tick (or across a clock
//! step backwards) would collide. [`NonceSequencer`] guards the timestamp
//! with the last issued value so every nonce it hands out is unique and
//! increasing, no matter how many tasks share it.

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

type Clock = Box<dyn Fn() -> u64 + Send + Sync>;

/// Issues strictly increasing nonces for one credential pair
///
/// Share one sequencer (behind an `Arc`) between every caller that signs
/// with the same API key.
pub struct NonceSequencer {
    last_issued: Mutex<u64>,
    clock: Clock,
}

impl NonceSequencer {
    /// Create a sequencer driven by the system clock at nanosecond resolution
    pub fn new() -> Self {
        Self::with_clock(unix_nanos)
    }

    /// Create a sequencer driven by a custom clock
    ///
    /// The clock may stall or go backwards; the sequencer still never
    /// repeats a value below `u64::MAX`. Once `u64::MAX` has been issued the
    /// sequence is exhausted and keeps returning it.
    pub fn with_clock(clock: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        Self {
            last_issued: Mutex::new(0),
            clock: Box::new(clock),
        }
    }

    /// Issue the next nonce
    pub fn next(&self) -> u64 {
        self.stamp(|nonce| nonce)
    }

    /// Issue the next nonce and run `f` with it while still holding the lock
    ///
    /// Anything built inside `f` (payload, signature, headers) is ordered
    /// with respect to every other stamped request, so requests leave the
    /// sequencer in nonce order.
    pub fn stamp<R>(&self, f: impl FnOnce(u64) -> R) -> R {
        let mut last = self.last_issued.lock();
        let candidate = (self.clock)();
        let nonce = if candidate > *last {
            candidate
        } else {
            last.saturating_add(1)
        };
        *last = nonce;
        f(nonce)
    }

    /// The most recently issued nonce, if any
    pub fn last_issued(&self) -> Option<u64> {
        match *self.last_issued.lock() {
            0 => None,
            n => Some(n),
        }
    }
}

impl Default for NonceSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NonceSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceSequencer")
            .field("last_issued", &*self.last_issued.lock())
            .finish()
    }
}

fn unix_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
