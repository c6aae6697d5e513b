//! SQLite transaction store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use fintrack_common::{Observable, Subscription};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info, instrument};

use crate::error::{LedgerError, LedgerResult};
use crate::repository::TransactionRepository;
use crate::transaction::{Transaction, TransactionId};

const SCHEMA: &str = include_str!("../migrations/0001_create_transactions.sql");

const SELECT_COLUMNS: &str = "SELECT id, kind, category, amount, date, notes FROM transactions";

const ORDER_BY: &str = "ORDER BY date DESC, id ASC";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Transaction row as stored.
#[derive(FromRow)]
struct DbTransaction {
    id: String,
    kind: String,
    category: String,
    amount: String,
    date: String,
    notes: Option<String>,
}

impl DbTransaction {
    fn into_domain(self) -> LedgerResult<Transaction> {
        let amount = Decimal::from_str(&self.amount)
            .map_err(|e| LedgerError::InvalidRecord(format!("amount {}: {e}", self.amount)))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| LedgerError::InvalidRecord(format!("date {}: {e}", self.date)))?;

        Ok(Transaction {
            id: TransactionId::parse(&self.id)?,
            kind: self.kind.parse()?,
            category: self.category,
            amount,
            date,
            notes: self.notes,
        })
    }
}

/// Transaction store backed by a SQLite database.
pub struct SqliteTransactionStore {
    pool: SqlitePool,
    listing: Observable<Vec<Transaction>>,
}

impl SqliteTransactionStore {
    /// Open the database at `database_url`, creating it and its schema if
    /// missing.
    pub async fn open(database_url: &str) -> LedgerResult<Self> {
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent)
                            .await
                            .map_err(|e| LedgerError::Database(e.to_string()))?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        Self::with_pool(pool).await
    }

    /// Use an existing pool, creating the schema if missing.
    pub async fn with_pool(pool: SqlitePool) -> LedgerResult<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;

        let store = Self {
            pool,
            listing: Observable::new(Vec::new()),
        };
        store.refresh().await?;

        info!(count = store.listing.get().len(), "Opened transaction store");
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch(&self, sql: &str, arg: Option<&str>) -> LedgerResult<Vec<Transaction>> {
        let mut query = sqlx::query_as::<_, DbTransaction>(sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn refresh(&self) -> LedgerResult<()> {
        let all = self
            .fetch(&format!("{SELECT_COLUMNS} {ORDER_BY}"), None)
            .await?;
        debug!(count = all.len(), "Publishing transaction listing");
        self.listing.set(all);
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionStore {
    fn list(&self) -> Subscription<Vec<Transaction>> {
        self.listing.subscribe()
    }

    async fn get_by_id(&self, id: &TransactionId) -> LedgerResult<Option<Transaction>> {
        let row: Option<DbTransaction> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(DbTransaction::into_domain).transpose()
    }

    #[instrument(skip_all, fields(id = %transaction.id))]
    async fn insert(&self, transaction: Transaction) -> LedgerResult<()> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO transactions (id, kind, category, amount, date, notes)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(transaction.id.as_str())
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount.to_string())
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.notes.as_deref())
        .execute(&self.pool)
        .await?;

        self.refresh().await
    }

    #[instrument(skip_all, fields(id = %transaction.id))]
    async fn update(&self, transaction: Transaction) -> LedgerResult<()> {
        let result = sqlx::query(
            r#"UPDATE transactions
               SET kind = ?, category = ?, amount = ?, date = ?, notes = ?
               WHERE id = ?"#,
        )
        .bind(transaction.kind.as_str())
        .bind(&transaction.category)
        .bind(transaction.amount.to_string())
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(transaction.notes.as_deref())
        .bind(transaction.id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound(transaction.id.to_string()));
        }

        self.refresh().await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete(&self, id: &TransactionId) -> LedgerResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            self.refresh().await?;
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> LedgerResult<Vec<Transaction>> {
        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE instr(lower(category), lower(?)) > 0
                OR instr(lower(coalesce(notes, '')), lower(?)) > 0
                OR instr(amount, ?) > 0
             {ORDER_BY}"
        );
        let rows: Vec<DbTransaction> = sqlx::query_as(&sql)
            .bind(query)
            .bind(query)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn by_category(&self, category: &str) -> LedgerResult<Vec<Transaction>> {
        let sql = format!("{SELECT_COLUMNS} WHERE category = ? {ORDER_BY}");
        self.fetch(&sql, Some(category)).await
    }
}
