//! Live rate provider backed by an ExchangeRate-API compatible endpoint.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use fintrack_common::{CurrencyCode, CurrencyPair};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Default endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/";

/// Configuration for the HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL; `latest/{code}` is appended.
    pub base_url: String,
    /// Optional per-request timeout. Unset means the client default.
    pub timeout: Option<Duration>,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Body of `GET /latest/{base}`.
#[derive(Debug, Deserialize)]
pub struct LatestRatesResponse {
    pub base: String,
    pub rates: HashMap<String, serde_json::Number>,
}

impl LatestRatesResponse {
    /// Read the rate for `to` as a fixed-point decimal.
    pub fn rate_for(&self, to: &CurrencyCode) -> Option<FxResult<Decimal>> {
        let number = self.rates.get(to.code())?;
        let text = number.to_string();
        Some(
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| FxError::MalformedResponse(format!("rate {text}: {e}"))),
        )
    }
}

/// Provider querying a live rates endpoint keyed by base currency.
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Provider id.
    pub const ID: &'static str = "exchangerate-api";

    /// Create a provider with the given configuration.
    pub fn new(config: HttpProviderConfig) -> FxResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config.base_url))
    }

    /// Create a provider sharing an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    /// Endpoint for rates keyed by `base`.
    pub fn latest_url(&self, base: &CurrencyCode) -> String {
        format!("{}latest/{}", self.base_url, base.code())
    }

    /// Fetch the rate, keeping the failure cause.
    pub async fn fetch_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<Decimal> {
        let url = self.latest_url(from);
        debug!(url = %url, "Requesting latest rates");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FxError::Transport(format!(
                "rates endpoint returned status {}",
                response.status()
            )));
        }

        let body: LatestRatesResponse = response.json().await?;

        body.rate_for(to).unwrap_or_else(|| {
            Err(FxError::RateNotAvailable {
                provider: Self::ID.to_string(),
                pair: CurrencyPair::new(from.clone(), to.clone()),
            })
        })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        "ExchangeRate-API"
    }

    #[instrument(skip_all, fields(from = %from, to = %to))]
    async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        match self.fetch_rate(from, to).await {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(provider = Self::ID, error = %e, "Rate lookup failed");
                None
            }
        }
    }
}
