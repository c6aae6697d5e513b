//! Transaction types and summaries.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

/// Unique identifier for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse a user-supplied ID. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> LedgerResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::InvalidRecord("transaction id is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(LedgerError::InvalidRecord(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

/// An income or expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionType,
    pub category: String,
    /// Unsigned amount; the direction comes from `kind`.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl Transaction {
    /// Create a transaction with a fresh ID.
    pub fn new(
        kind: TransactionType,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            kind,
            category: category.into(),
            amount,
            date,
            notes: None,
        }
    }

    /// Set the ID.
    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Amount with expenses negated.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    /// Check if `query` occurs in the category, notes or amount text,
    /// ignoring ASCII case. Non-ASCII letters must match exactly, as with
    /// SQLite's `lower()`.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_ascii_lowercase();
        self.category.to_ascii_lowercase().contains(&needle)
            || self
                .notes
                .as_deref()
                .is_some_and(|n| n.to_ascii_lowercase().contains(&needle))
            || self.amount.to_string().contains(&needle)
    }
}

/// Listing order: newest date first, then by ID.
pub(crate) fn sort_for_listing(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Sum income and expense. `balance` is income minus expense.
///
/// Fails with [`LedgerError::Overflow`] when a total leaves the decimal range.
pub fn summarize(transactions: &[Transaction]) -> LedgerResult<LedgerSummary> {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for tx in transactions {
        let total = match tx.kind {
            TransactionType::Income => &mut income,
            TransactionType::Expense => &mut expense,
        };
        *total = total
            .checked_add(tx.amount)
            .ok_or_else(|| LedgerError::Overflow(format!("{} total", tx.kind)))?;
    }

    let balance = income
        .checked_sub(expense)
        .ok_or_else(|| LedgerError::Overflow("balance".to_string()))?;

    Ok(LedgerSummary {
        income,
        expense,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transaction_type_round_trips_through_text() {
        assert_eq!("INCOME".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!(TransactionType::Expense.to_string(), "EXPENSE");
        assert!("TRANSFER".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_id_parse() {
        assert_eq!(TransactionId::parse(" 1 ").unwrap().as_str(), "1");
        assert!(TransactionId::parse("  ").is_err());
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn test_signed_amount() {
        let income = Transaction::new(TransactionType::Income, "Salary", dec!(1000), date("2024-01-01"));
        let expense = Transaction::new(TransactionType::Expense, "Food", dec!(50), date("2024-01-02"));

        assert_eq!(income.signed_amount(), dec!(1000));
        assert_eq!(expense.signed_amount(), dec!(-50));
    }

    #[test]
    fn test_matches_category_notes_and_amount() {
        let tx = Transaction::new(TransactionType::Expense, "Groceries", dec!(42.50), date("2024-01-01"))
            .with_notes("Weekly Market run");

        assert!(tx.matches("groc"));
        assert!(tx.matches("MARKET"));
        assert!(tx.matches("42.5"));
        assert!(!tx.matches("rent"));
    }

    #[test]
    fn test_matches_folds_ascii_case_only() {
        let tx = Transaction::new(TransactionType::Expense, "Café", dec!(4), date("2024-01-01"));

        assert!(tx.matches("CAF"));
        assert!(tx.matches("café"));
        assert!(!tx.matches("CAFÉ"));
    }

    #[test]
    fn test_summarize() {
        let txs = vec![
            Transaction::new(TransactionType::Income, "Salary", dec!(3000), date("2024-01-01")),
            Transaction::new(TransactionType::Expense, "Rent", dec!(1200), date("2024-01-02")),
            Transaction::new(TransactionType::Expense, "Food", dec!(250.75), date("2024-01-03")),
        ];

        let summary = summarize(&txs).unwrap();
        assert_eq!(summary.income, dec!(3000));
        assert_eq!(summary.expense, dec!(1450.75));
        assert_eq!(summary.balance, dec!(1549.25));
        assert_eq!(summarize(&[]).unwrap(), LedgerSummary::default());
    }

    #[test]
    fn test_summarize_out_of_range_totals() {
        let income = |amount| Transaction::new(TransactionType::Income, "Salary", amount, date("2024-01-01"));
        let expense = |amount| Transaction::new(TransactionType::Expense, "Rent", amount, date("2024-01-01"));

        let result = summarize(&[income(Decimal::MAX), income(Decimal::MAX)]);
        assert!(matches!(result, Err(LedgerError::Overflow(_))));

        // Each total fits but income minus expense does not.
        let result = summarize(&[income(Decimal::MAX), expense(Decimal::MAX), expense(Decimal::MAX)]);
        assert!(matches!(result, Err(LedgerError::Overflow(_))));

        let summary = summarize(&[income(Decimal::MAX), expense(Decimal::MAX)]).unwrap();
        assert_eq!(summary.balance, Decimal::ZERO);
    }

    #[test]
    fn test_listing_order() {
        let mut txs = vec![
            Transaction::new(TransactionType::Income, "a", dec!(1), date("2024-01-01"))
                .with_id(TransactionId::parse("b").unwrap()),
            Transaction::new(TransactionType::Income, "b", dec!(1), date("2024-03-01")),
            Transaction::new(TransactionType::Income, "c", dec!(1), date("2024-01-01"))
                .with_id(TransactionId::parse("a").unwrap()),
        ];
        sort_for_listing(&mut txs);

        assert_eq!(txs[0].category, "b");
        assert_eq!(txs[1].id.as_str(), "a");
        assert_eq!(txs[2].id.as_str(), "b");
    }
}
