//! FinTrack application
//!
//! Configuration, service wiring and the `fintrack` command-line interface.

pub mod bootstrap;
pub mod cli;
pub mod config;

pub use bootstrap::FinanceTracker;
pub use cli::{Cli, Command, TxCommand};
pub use config::{LogFormat, RatesConfig, TrackerConfig};
