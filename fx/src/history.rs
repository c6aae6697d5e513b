//! Bounded log of recent conversions.

use fintrack_common::{Observable, Subscription};
use tracing::debug;

use crate::conversion::ConversionResult;

/// Number of conversions kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of conversions, at most one per ordered pair.
///
/// Observers receive the current list on subscription and a fresh snapshot
/// after every `record` or `clear`.
pub struct RecentConversions {
    entries: Observable<Vec<ConversionResult>>,
    capacity: usize,
}

impl RecentConversions {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Observable::new(Vec::new()),
            capacity,
        }
    }

    /// Record a conversion at the front, replacing any entry for the same pair.
    pub fn record(&self, result: ConversionResult) {
        let capacity = self.capacity;
        let pair = result.pair();

        let entries = self.entries.update(move |entries| {
            entries.retain(|e| !e.same_pair(&result));
            entries.insert(0, result);
            entries.truncate(capacity);
        });

        debug!(pair = %pair, entries = entries.len(), "Recorded conversion");
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.set(Vec::new());
    }

    /// Current entries, most recent first.
    pub fn snapshot(&self) -> Vec<ConversionResult> {
        self.entries.get()
    }

    /// Subscribe to the list. The first value is the current list.
    pub fn subscribe(&self) -> Subscription<Vec<ConversionResult>> {
        self.entries.subscribe()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecentConversions {
    fn default() -> Self {
        Self::new()
    }
}
