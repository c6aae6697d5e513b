//! FinTrack Ledger
//!
//! Income and expense transactions with observable listings, backed by
//! SQLite or kept in memory.

pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;
pub mod transaction;

pub use error::{LedgerError, LedgerResult};
pub use memory::InMemoryTransactionStore;
pub use repository::TransactionRepository;
pub use sqlite::SqliteTransactionStore;
pub use transaction::{summarize, LedgerSummary, Transaction, TransactionId, TransactionType};
