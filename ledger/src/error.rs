//! Ledger error types.

use thiserror::Error;

/// Errors raised by transaction stores.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Amount out of range: {0}")]
    Overflow(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Database(e.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
