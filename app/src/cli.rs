//! Command-line interface.

use std::io::Write;

use anyhow::{anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fintrack_common::{to_datetime, CurrencyCode, Timestamp};
use fintrack_fx::parse_amount;
use fintrack_ledger::{summarize, Transaction, TransactionId, TransactionType};
use serde::Serialize;

use crate::bootstrap::FinanceTracker;

/// FinTrack CLI
#[derive(Parser, Debug)]
#[command(name = "fintrack", version)]
#[command(about = "Track income and expenses and convert between currencies")]
pub struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported currencies
    Currencies,

    /// List rate providers and the active one
    Providers,

    /// Convert amounts between currencies
    Convert {
        /// One or more AMOUNT FROM TO triples, converted in order
        #[arg(required = true, value_name = "AMOUNT FROM TO")]
        conversions: Vec<String>,
        /// Provider to use for these conversions
        #[arg(long)]
        provider: Option<String>,
        /// Print the recent-conversions list afterwards
        #[arg(long)]
        recent: bool,
    },

    /// Manage transactions
    #[command(subcommand)]
    Tx(TxCommand),
}

#[derive(Subcommand, Debug)]
pub enum TxCommand {
    /// Record a transaction
    Add {
        /// income or expense
        kind: TransactionType,
        category: String,
        amount: String,
        /// Date as YYYY-MM-DD (default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
        /// Explicit ID; an existing transaction with this ID is replaced
        #[arg(long)]
        id: Option<String>,
    },

    /// Change fields of an existing transaction
    Edit {
        id: String,
        #[arg(long)]
        kind: Option<TransactionType>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List all transactions, newest first
    List,

    /// Show one transaction
    Show { id: String },

    /// Search category, notes and amount
    Search { query: String },

    /// List transactions in a category
    Category { name: String },

    /// Delete a transaction
    Delete { id: String },

    /// Income, expense and balance totals
    Summary,
}

/// Execute a parsed command, writing results to `out`.
pub async fn run(tracker: &FinanceTracker, cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        Command::Currencies => {
            let currencies = tracker.engine.supported_currencies();
            if json {
                return print_json(out, &currencies);
            }
            for currency in currencies {
                writeln!(out, "{currency}")?;
            }
        }

        Command::Providers => {
            let providers = tracker.engine.providers();
            if json {
                return print_json(out, &providers);
            }
            for p in providers {
                let marker = if p.active { "*" } else { " " };
                writeln!(out, "{marker} {:<18} {}", p.id, p.display_name)?;
            }
        }

        Command::Convert {
            conversions,
            provider,
            recent,
        } => {
            if conversions.len() % 3 != 0 {
                bail!("Expected AMOUNT FROM TO triples, got {} values", conversions.len());
            }
            let requests = conversions
                .chunks(3)
                .map(|triple| -> anyhow::Result<_> {
                    let amount = parse_amount(&triple[0])?;
                    Ok((amount, CurrencyCode::new(&triple[1]), CurrencyCode::new(&triple[2])))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            if let Some(id) = provider {
                if !tracker.engine.registry().contains(&id) {
                    bail!("Unknown provider: {id}");
                }
                tracker.engine.set_active_provider(&id);
            }

            let mut results = Vec::with_capacity(requests.len());
            for (amount, from, to) in requests {
                let result = tracker
                    .engine
                    .convert(amount, &from, &to)
                    .await
                    .ok_or_else(|| anyhow!("No rate available for {from} -> {to}"))?;
                results.push(result);
            }

            if json {
                return match (recent, results.as_slice()) {
                    (false, [single]) => print_json(out, single),
                    (false, _) => print_json(out, &results),
                    (true, _) => print_json(
                        out,
                        &serde_json::json!({
                            "conversions": &results,
                            "recent": tracker.engine.recent_conversions(),
                        }),
                    ),
                };
            }
            for result in &results {
                writeln!(out, "{result}")?;
            }
            if recent {
                writeln!(out, "Recent:")?;
                for result in tracker.engine.recent_conversions() {
                    writeln!(out, "  {}  {result}", format_timestamp(result.timestamp))?;
                }
            }
        }

        Command::Tx(command) => run_tx(tracker, command, json, out).await?,
    }

    Ok(())
}

async fn run_tx(
    tracker: &FinanceTracker,
    command: TxCommand,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let store = &tracker.transactions;

    match command {
        TxCommand::Add {
            kind,
            category,
            amount,
            date,
            notes,
            id,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut transaction = Transaction::new(kind, category, parse_amount(&amount)?, date);
            if let Some(id) = id {
                transaction = transaction.with_id(TransactionId::parse(&id)?);
            }
            transaction.notes = notes;

            store.insert(transaction.clone()).await?;
            if json {
                return print_json(out, &transaction);
            }
            writeln!(out, "Added {}", transaction.id)?;
        }

        TxCommand::Edit {
            id,
            kind,
            category,
            amount,
            date,
            notes,
        } => {
            let id = TransactionId::parse(&id)?;
            let mut transaction = store
                .get_by_id(&id)
                .await?
                .ok_or_else(|| anyhow!("Transaction not found: {id}"))?;

            if let Some(kind) = kind {
                transaction.kind = kind;
            }
            if let Some(category) = category {
                transaction.category = category;
            }
            if let Some(amount) = amount {
                transaction.amount = parse_amount(&amount)?;
            }
            if let Some(date) = date {
                transaction.date = date;
            }
            if notes.is_some() {
                transaction.notes = notes;
            }

            store.update(transaction.clone()).await?;
            if json {
                return print_json(out, &transaction);
            }
            writeln!(out, "Updated {}", transaction.id)?;
        }

        TxCommand::List => {
            let all = store.list().latest().unwrap_or_default();
            print_transactions(out, &all, json)?;
        }

        TxCommand::Show { id } => {
            let id = TransactionId::parse(&id)?;
            let transaction = store
                .get_by_id(&id)
                .await?
                .ok_or_else(|| anyhow!("Transaction not found: {id}"))?;
            print_transactions(out, std::slice::from_ref(&transaction), json)?;
        }

        TxCommand::Search { query } => {
            print_transactions(out, &store.search(&query).await?, json)?;
        }

        TxCommand::Category { name } => {
            print_transactions(out, &store.by_category(&name).await?, json)?;
        }

        TxCommand::Delete { id } => {
            let id = TransactionId::parse(&id)?;
            store.delete(&id).await?;
            if !json {
                writeln!(out, "Deleted {id}")?;
            }
        }

        TxCommand::Summary => {
            let all = store.list().latest().unwrap_or_default();
            let summary = summarize(&all)?;
            if json {
                return print_json(out, &summary);
            }
            writeln!(out, "Income:  {}", summary.income)?;
            writeln!(out, "Expense: {}", summary.expense)?;
            writeln!(out, "Balance: {}", summary.balance)?;
        }
    }

    Ok(())
}

fn print_transactions(out: &mut dyn Write, transactions: &[Transaction], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(out, &transactions);
    }
    for tx in transactions {
        write!(
            out,
            "{}  {}  {:<7}  {:<16}  {:>12}",
            tx.date,
            tx.id,
            tx.kind,
            tx.category,
            tx.signed_amount()
        )?;
        match &tx.notes {
            Some(notes) => writeln!(out, "  {notes}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

fn format_timestamp(timestamp: Timestamp) -> String {
    match to_datetime(timestamp) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp.to_string(),
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use fintrack_ledger::InMemoryTransactionStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn tracker() -> FinanceTracker {
        let mut config = TrackerConfig::default();
        config.rates.mock_latency = Duration::ZERO..=Duration::ZERO;
        FinanceTracker::with_store(&config, Arc::new(InMemoryTransactionStore::new())).unwrap()
    }

    async fn exec(tracker: &FinanceTracker, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("fintrack").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(tracker, cli, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn test_convert_with_mock() {
        let tracker = tracker();

        let output = exec(&tracker, &["convert", "100", "usd", "EUR"]).await.unwrap();
        assert_eq!(output.trim(), "100 USD = 85.00 EUR (rate 0.850000)");
        assert_eq!(tracker.engine.recent_conversions().len(), 1);
    }

    #[tokio::test]
    async fn test_convert_rejects_bad_input() {
        let tracker = tracker();

        assert!(exec(&tracker, &["convert", "-3", "USD", "EUR"]).await.is_err());
        assert!(exec(&tracker, &["convert", "1", "USD", "ZZZ"]).await.is_err());
        assert!(exec(&tracker, &["convert", "1", "USD", "EUR", "--provider", "nope"])
            .await
            .is_err());
        assert!(tracker.engine.recent_conversions().is_empty());
    }

    #[tokio::test]
    async fn test_convert_several_and_print_recent() {
        let tracker = tracker();

        let output = exec(
            &tracker,
            &["convert", "100", "USD", "EUR", "2", "EUR", "USD", "5", "USD", "EUR", "--recent"],
        )
        .await
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "Recent:");
        assert!(lines[4].ends_with("5 USD = 4.25 EUR (rate 0.850000)"));
        assert!(lines[5].contains("EUR = "));
        assert!(lines[5].contains(" UTC  "));

        let recent = tracker.engine.recent_conversions();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].from_amount, dec!(5));
    }

    #[tokio::test]
    async fn test_convert_json_with_recent() {
        let tracker = tracker();

        let output = exec(&tracker, &["--json", "convert", "1", "USD", "JPY", "--recent"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["conversions"].as_array().unwrap().len(), 1);
        assert_eq!(value["recent"][0]["to_currency"], serde_json::json!("JPY"));
    }

    #[tokio::test]
    async fn test_convert_rejects_incomplete_triple() {
        let tracker = tracker();

        assert!(exec(&tracker, &["convert", "1", "USD", "EUR", "2", "USD"]).await.is_err());
        assert!(tracker.engine.recent_conversions().is_empty());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }

    #[tokio::test]
    async fn test_providers_marks_active() {
        let tracker = tracker();

        let output = exec(&tracker, &["providers"]).await.unwrap();
        let active: Vec<&str> = output.lines().filter(|l| l.starts_with('*')).collect();
        assert_eq!(active.len(), 1);
        assert!(active[0].contains("mock"));
    }

    #[tokio::test]
    async fn test_transaction_commands() {
        let tracker = tracker();

        exec(
            &tracker,
            &["tx", "add", "income", "Salary", "3000", "--date", "2024-01-01", "--id", "s1"],
        )
        .await
        .unwrap();
        exec(
            &tracker,
            &["tx", "add", "expense", "Food", "45.50", "--date", "2024-01-03", "--id", "f1", "--notes", "Dinner"],
        )
        .await
        .unwrap();

        let list = exec(&tracker, &["tx", "list"]).await.unwrap();
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("f1"));
        assert!(lines[0].contains("-45.50"));

        let found = exec(&tracker, &["tx", "search", "dinner"]).await.unwrap();
        assert_eq!(found.lines().count(), 1);

        exec(&tracker, &["tx", "edit", "f1", "--amount", "50"]).await.unwrap();
        let summary = exec(&tracker, &["tx", "summary", "--json"]).await.unwrap();
        let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(summary["balance"], serde_json::json!("2950"));

        exec(&tracker, &["tx", "delete", "s1"]).await.unwrap();
        assert!(exec(&tracker, &["tx", "show", "s1"]).await.is_err());

        let remaining = tracker.transactions.list().latest().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].amount, dec!(50));
    }

    #[tokio::test]
    async fn test_edit_missing_transaction_fails() {
        let tracker = tracker();

        assert!(exec(&tracker, &["tx", "edit", "ghost", "--category", "Misc"]).await.is_err());
    }
}
