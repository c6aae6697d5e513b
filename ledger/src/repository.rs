//! Storage abstraction for transactions.

use async_trait::async_trait;
use fintrack_common::Subscription;

use crate::error::LedgerResult;
use crate::transaction::{Transaction, TransactionId};

/// Trait for transaction stores.
///
/// Listings are ordered by date, newest first. The subscription returned by
/// [`list`](TransactionRepository::list) yields the current listing and a
/// fresh one after every successful mutation.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Subscribe to the full listing.
    fn list(&self) -> Subscription<Vec<Transaction>>;

    async fn get_by_id(&self, id: &TransactionId) -> LedgerResult<Option<Transaction>>;

    /// Insert, replacing any transaction with the same ID.
    async fn insert(&self, transaction: Transaction) -> LedgerResult<()>;

    /// Update an existing transaction.
    ///
    /// Returns [`LedgerError::NotFound`](crate::LedgerError::NotFound) if the
    /// ID is absent.
    async fn update(&self, transaction: Transaction) -> LedgerResult<()>;

    /// Delete by ID. Deleting an absent ID succeeds.
    async fn delete(&self, id: &TransactionId) -> LedgerResult<()>;

    /// Case-insensitive substring search over category, notes and amount.
    async fn search(&self, query: &str) -> LedgerResult<Vec<Transaction>>;

    /// Transactions whose category equals `category` exactly.
    async fn by_category(&self, category: &str) -> LedgerResult<Vec<Transaction>>;
}
