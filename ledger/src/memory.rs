//! In-memory transaction store.

use std::collections::HashMap;

use async_trait::async_trait;
use fintrack_common::{Observable, Subscription};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::repository::TransactionRepository;
use crate::transaction::{sort_for_listing, Transaction, TransactionId};

/// Transaction store kept in process memory.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    rows: Mutex<HashMap<TransactionId, Transaction>>,
    listing: Observable<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<F>(&self, filter: F) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        select(&self.rows.lock(), filter)
    }

    /// Publish the listing for `rows`. Callers hold the rows lock so
    /// snapshots go out in mutation order.
    fn publish(&self, rows: &HashMap<TransactionId, Transaction>) {
        let all = select(rows, |_| true);
        debug!(count = all.len(), "Publishing transaction listing");
        self.listing.set(all);
    }
}

fn select<F>(rows: &HashMap<TransactionId, Transaction>, filter: F) -> Vec<Transaction>
where
    F: Fn(&Transaction) -> bool,
{
    let mut selected: Vec<Transaction> = rows.values().filter(|tx| filter(*tx)).cloned().collect();
    sort_for_listing(&mut selected);
    selected
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionStore {
    fn list(&self) -> Subscription<Vec<Transaction>> {
        self.listing.subscribe()
    }

    async fn get_by_id(&self, id: &TransactionId) -> LedgerResult<Option<Transaction>> {
        Ok(self.rows.lock().get(id).cloned())
    }

    async fn insert(&self, transaction: Transaction) -> LedgerResult<()> {
        let mut rows = self.rows.lock();
        rows.insert(transaction.id.clone(), transaction);
        self.publish(&rows);
        Ok(())
    }

    async fn update(&self, transaction: Transaction) -> LedgerResult<()> {
        let mut rows = self.rows.lock();
        let slot = rows
            .get_mut(&transaction.id)
            .ok_or_else(|| LedgerError::NotFound(transaction.id.to_string()))?;
        *slot = transaction;
        self.publish(&rows);
        Ok(())
    }

    async fn delete(&self, id: &TransactionId) -> LedgerResult<()> {
        let mut rows = self.rows.lock();
        if rows.remove(id).is_some() {
            self.publish(&rows);
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> LedgerResult<Vec<Transaction>> {
        Ok(self.select(|tx| tx.matches(query)))
    }

    async fn by_category(&self, category: &str) -> LedgerResult<Vec<Transaction>> {
        Ok(self.select(|tx| tx.category == category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn tx(id: &str, kind: TransactionType, category: &str, day: u32) -> Transaction {
        Transaction::new(
            kind,
            category,
            dec!(10),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        )
        .with_id(TransactionId::parse(id).unwrap())
    }

    #[tokio::test]
    async fn test_insert_replaces_on_same_id() {
        let store = InMemoryTransactionStore::new();
        store.insert(tx("1", TransactionType::Expense, "Food", 1)).await.unwrap();
        store.insert(tx("1", TransactionType::Expense, "Travel", 1)).await.unwrap();

        let id = TransactionId::parse("1").unwrap();
        assert_eq!(store.get_by_id(&id).await.unwrap().unwrap().category, "Travel");
        assert_eq!(store.list().latest().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryTransactionStore::new();
        let result = store.update(tx("9", TransactionType::Income, "Salary", 1)).await;

        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryTransactionStore::new();
        let mut sub = store.list();

        store.delete(&TransactionId::parse("nope").unwrap()).await.unwrap();

        assert_eq!(sub.try_next(), Some(vec![]));
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_listing_follows_mutations() {
        let store = InMemoryTransactionStore::new();
        let mut sub = store.list();

        store.insert(tx("a", TransactionType::Income, "Salary", 1)).await.unwrap();
        store.insert(tx("b", TransactionType::Expense, "Food", 5)).await.unwrap();
        store.delete(&TransactionId::parse("a").unwrap()).await.unwrap();

        assert!(sub.next().await.unwrap().is_empty());
        assert_eq!(sub.next().await.unwrap().len(), 1);
        let both = sub.next().await.unwrap();
        assert_eq!(both[0].id.as_str(), "b");
        assert_eq!(both[1].id.as_str(), "a");
        assert_eq!(sub.next().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_and_category() {
        let store = InMemoryTransactionStore::new();
        store
            .insert(tx("1", TransactionType::Expense, "Food", 1).with_notes("Lunch with team"))
            .await
            .unwrap();
        store.insert(tx("2", TransactionType::Expense, "food", 2)).await.unwrap();
        store.insert(tx("3", TransactionType::Income, "Salary", 3)).await.unwrap();

        let found = store.search("FOOD").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id.as_str(), "2");

        assert_eq!(store.search("team").await.unwrap().len(), 1);
        assert_eq!(store.by_category("Food").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_folds_ascii_case_only() {
        let store = InMemoryTransactionStore::new();
        store.insert(tx("1", TransactionType::Expense, "Café", 1)).await.unwrap();

        assert_eq!(store.search("CAF").await.unwrap().len(), 1);
        assert!(store.search("CAFÉ").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_publish_in_order() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let mut sub = store.list();
        assert!(sub.next().await.unwrap().is_empty());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let id = format!("t{i:02}");
                    store.insert(tx(&id, TransactionType::Expense, "Food", 1)).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        for expected in 1..=32 {
            assert_eq!(sub.next().await.unwrap().len(), expected);
        }
        assert_eq!(store.list().latest().unwrap().len(), 32);
    }
}
