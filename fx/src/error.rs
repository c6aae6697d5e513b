//! FX error types.
//!
//! Conversion and rate lookups report failure as an absent value; these
//! errors carry the discarded cause to the logs.

use fintrack_common::CurrencyPair;
use thiserror::Error;

/// Errors that can occur while producing a rate or a conversion.
#[derive(Debug, Error)]
pub enum FxError {
    /// The provider has no rate for the requested currency pair.
    #[error("Rate not available for {pair} from provider {provider}")]
    RateNotAvailable { provider: String, pair: CurrencyPair },

    /// No rate provider has been registered yet.
    #[error("No active rate provider")]
    NoActiveProvider,

    /// The upstream request failed.
    #[error("Rate provider transport error: {0}")]
    Transport(String),

    /// The upstream response could not be interpreted.
    #[error("Malformed rate response: {0}")]
    MalformedResponse(String),

    /// The converted amount exceeds the decimal range.
    #[error("Converted amount out of range: {0}")]
    AmountOverflow(String),

    /// The amount to convert is not a positive number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<reqwest::Error> for FxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FxError::MalformedResponse(e.to_string())
        } else {
            FxError::Transport(e.to_string())
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
