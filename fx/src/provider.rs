//! Rate provider trait and the built-in mock provider.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use fintrack_common::{CurrencyCode, CurrencyPair};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Fractional digits of a cross rate computed from a reference table.
pub const CROSS_RATE_SCALE: u32 = 6;

/// Trait for exchange-rate providers.
///
/// Implementations answer `None` when either currency is unknown to them or
/// the upstream lookup fails; they never panic or propagate the cause.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier within a registry.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn display_name(&self) -> &str;

    /// Get the rate converting one unit of `from` into `to`.
    async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal>;
}

/// Rates against USD used by [`MockRateProvider::new`].
const DEFAULT_MOCK_RATES: &[(&str, &str)] = &[
    ("USD", "1.0"),
    ("EUR", "0.85"),
    ("GBP", "0.73"),
    ("JPY", "110.0"),
    ("AUD", "1.35"),
    ("CAD", "1.25"),
    ("CHF", "0.92"),
    ("CNY", "6.45"),
    ("SEK", "8.60"),
    ("NOK", "8.50"),
    ("DKK", "6.35"),
    ("PLN", "3.80"),
    ("INR", "74.0"),
    ("KRW", "1180.0"),
    ("SGD", "1.35"),
    ("HKD", "7.80"),
    ("MXN", "20.0"),
    ("BRL", "5.20"),
];

/// Offline provider backed by a fixed reference table.
///
/// Every lookup waits a random delay from the configured latency range
/// before answering.
pub struct MockRateProvider {
    id: String,
    display_name: String,
    rates: HashMap<CurrencyCode, Decimal>,
    latency: RangeInclusive<Duration>,
}

impl MockRateProvider {
    /// Provider id used by [`MockRateProvider::new`].
    pub const ID: &'static str = "mock";

    /// Create the default mock provider (USD reference table, 100-300 ms latency).
    pub fn new() -> Self {
        let rates = DEFAULT_MOCK_RATES
            .iter()
            .filter_map(|(code, rate)| Some((CurrencyCode::new(*code), rate.parse().ok()?)))
            .collect();

        Self {
            id: Self::ID.to_string(),
            display_name: "Mock Provider".to_string(),
            rates,
            latency: Duration::from_millis(100)..=Duration::from_millis(300),
        }
    }

    /// Replace the reference table.
    pub fn with_rates<I, C>(mut self, rates: I) -> Self
    where
        I: IntoIterator<Item = (C, Decimal)>,
        C: Into<CurrencyCode>,
    {
        self.rates = rates.into_iter().map(|(c, r)| (c.into(), r)).collect();
        self
    }

    /// Override the provider identity.
    pub fn with_identity(mut self, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.id = id.into();
        self.display_name = display_name.into();
        self
    }

    /// Set the simulated latency range.
    pub fn with_latency(mut self, latency: RangeInclusive<Duration>) -> Self {
        self.latency = latency;
        self
    }

    /// Answer immediately.
    pub fn without_latency(self) -> Self {
        self.with_latency(Duration::ZERO..=Duration::ZERO)
    }

    /// Codes present in the reference table, sorted.
    pub fn supported_codes(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Cross rate `to / from`, rounded half-up to [`CROSS_RATE_SCALE`] digits.
    pub fn cross_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        let from_rate = self.rates.get(from)?;
        let to_rate = self.rates.get(to)?;

        let mut rate = to_rate
            .checked_div(*from_rate)?
            .round_dp_with_strategy(CROSS_RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rate.rescale(CROSS_RATE_SCALE);
        Some(rate)
    }

    fn sample_delay(&self) -> Duration {
        let (lo, hi) = (*self.latency.start(), *self.latency.end());
        if hi <= lo {
            return lo;
        }
        let millis = rand::thread_rng().gen_range(lo.as_millis() as u64..=hi.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for MockRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        let delay = self.sample_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let rate = self.cross_rate(from, to);
        if rate.is_none() {
            debug!(
                provider = %self.id,
                pair = %CurrencyPair::new(from.clone(), to.clone()),
                "Currency not in mock table"
            );
        }
        rate
    }
}
